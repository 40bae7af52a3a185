use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lang {
    En,
    Ru,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }

    /// Unknown codes fall back to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Lang::Ru,
            _ => Lang::En,
        }
    }
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.new" => if ru { "Новая система...  Ctrl+N" } else { "New system...  Ctrl+N" },
        "menu.load_sol" => if ru { "Загрузить шаблон Sol" } else { "Load Sol template" },
        "menu.open" => if ru { "Открыть...  Ctrl+O" } else { "Open...  Ctrl+O" },
        "menu.open_title" => if ru { "Открыть систему" } else { "Open system" },
        "menu.library" => if ru { "Открыть из библиотеки..." } else { "Open from library..." },
        "menu.save" => if ru { "Сохранить  Ctrl+S" } else { "Save  Ctrl+S" },
        "menu.save_as" => if ru { "Сохранить как..." } else { "Save as..." },
        "menu.save_title" => if ru { "Сохранить JSON системы" } else { "Save system JSON" },
        "menu.save_bundle" => if ru { "Сохранить архив с текстурами..." } else { "Save bundle with sprites..." },
        "menu.bundle_title" => if ru { "Сохранить ZIP системы" } else { "Save system ZIP" },
        "menu.save_library" => if ru { "Сохранить в библиотеку" } else { "Save to library" },
        "menu.sprite_dir" => if ru { "Папка текстур..." } else { "Sprite folder..." },
        "menu.reload_sprites" => if ru { "Обновить текстуры" } else { "Reload sprites" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.edit" => if ru { "Правка" } else { "Edit" },
        "menu.add_star" => if ru { "Добавить звезду-компаньон" } else { "Add companion star" },
        "menu.add_belt" => if ru { "Добавить пояс астероидов" } else { "Add asteroid belt" },
        "menu.delete" => if ru { "Удалить  Del" } else { "Delete  Del" },
        "menu.deselect" => if ru { "Снять выделение  Esc" } else { "Deselect  Esc" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.hierarchy" => if ru { "Иерархия" } else { "Hierarchy" },
        "menu.properties" => if ru { "Свойства" } else { "Properties" },
        "menu.show_orbits" => if ru { "Орбиты  O" } else { "Show orbits  O" },
        "menu.animate" => if ru { "Анимация  Пробел" } else { "Animate  Space" },
        "menu.focus" => if ru { "Следить за выбранным  F" } else { "Follow selection  F" },
        "menu.reset_camera" => if ru { "Сбросить камеру  Home" } else { "Reset camera  Home" },
        "menu.language" => if ru { "Язык" } else { "Language" },
        "menu.settings" => if ru { "Настройки..." } else { "Settings..." },

        // ── Hierarchy ───────────────────────────────────────
        "tree.title" => if ru { "Иерархия" } else { "Hierarchy" },
        "tree.no_system" => if ru { "Система не загружена" } else { "No system loaded" },
        "tree.new_system" => if ru { "Новая система" } else { "New system" },
        "tree.add_planet" => if ru { "Добавить планету" } else { "Add planet" },
        "tree.add_moon" => if ru { "Добавить луну" } else { "Add moon" },
        "tree.add_station" => if ru { "Добавить станцию" } else { "Add station" },
        "tree.focus" => if ru { "Следить" } else { "Follow" },
        "tree.delete" => if ru { "Удалить" } else { "Delete" },
        "tree.last_star" => if ru { "Нельзя удалить последнюю звезду" } else { "The last star cannot be deleted" },

        // ── Properties ──────────────────────────────────────
        "prop.title" => if ru { "Свойства" } else { "Properties" },
        "prop.select_body" => if ru { "Выберите тело для редактирования" } else { "Select a body to edit it" },
        "prop.system" => if ru { "Система" } else { "System" },
        "prop.bounds" => if ru { "Размеры" } else { "Bounds" },
        "prop.general" => if ru { "Общие" } else { "General" },
        "prop.id" => "ID",
        "prop.type" => if ru { "Тип" } else { "Type" },
        "prop.name" => if ru { "Имя" } else { "Name" },
        "prop.description" => if ru { "Описание" } else { "Description" },
        "prop.sprite" => if ru { "Текстура" } else { "Sprite" },
        "prop.no_sprite" => if ru { "(нет)" } else { "(none)" },
        "prop.scale" => if ru { "Масштаб" } else { "Scale" },
        "prop.rotation" => if ru { "Поворот" } else { "Rotation" },
        "prop.rotation_speed" => if ru { "Скорость вращения" } else { "Rotation speed" },
        "prop.luminosity" => if ru { "Светимость" } else { "Luminosity" },
        "prop.station_type" => if ru { "Тип станции" } else { "Station type" },
        "prop.orbit" => if ru { "Орбита" } else { "Orbit" },
        "prop.orbit_distance" => if ru { "Радиус" } else { "Distance" },
        "prop.orbit_speed" => if ru { "Скорость" } else { "Speed" },
        "prop.orbit_angle" => if ru { "Угол" } else { "Angle" },
        "prop.appearance" => if ru { "Внешний вид" } else { "Appearance" },
        "prop.base_size" => if ru { "Базовый размер" } else { "Base size" },
        "prop.fill" => if ru { "Цвет" } else { "Fill color" },
        "prop.ring_color" => if ru { "Цвет орбиты" } else { "Ring color" },
        "prop.ring_width" => if ru { "Толщина орбиты" } else { "Ring width" },
        "prop.ring_only" => if ru { "Только кольцо" } else { "Ring only" },
        "prop.default" => if ru { "По умолчанию" } else { "Default" },
        "prop.expr_hint" => if ru { "Число или выражение, например 100 + 80 * 2" } else { "Number or expression, e.g. 100 + 80 * 2" },

        // ── Status bar ──────────────────────────────────────
        "status.no_system" => if ru { "Нет системы" } else { "No system" },
        "status.bodies" => if ru { "Тела" } else { "Bodies" },
        "status.zoom" => if ru { "Масштаб" } else { "Zoom" },
        "status.selected" => if ru { "Выбрано" } else { "Selected" },
        "status.following" => if ru { "Слежение" } else { "Following" },
        "status.unsaved" => if ru { "Есть несохранённые изменения" } else { "Unsaved changes" },
        "status.saved" => if ru { "Сохранено" } else { "Saved" },
        "status.busy" => if ru { "Выполняется..." } else { "Working..." },
        "status.paused" => if ru { "Пауза" } else { "Paused" },
        "status.local" => if ru { "Локальный режим" } else { "Local mode" },

        // ── Dialogs ─────────────────────────────────────────
        "dlg.new_title" => if ru { "Новая система" } else { "New system" },
        "dlg.star_name" => if ru { "Имя звезды" } else { "Star name" },
        "dlg.create" => if ru { "Создать" } else { "Create" },
        "dlg.cancel" => if ru { "Отмена" } else { "Cancel" },
        "dlg.unsaved_title" => if ru { "Несохранённые изменения" } else { "Unsaved changes" },
        "dlg.unsaved_text" => if ru { "Есть несохранённые изменения. Продолжить и потерять их?" } else { "You have unsaved changes. Continue and discard them?" },
        "dlg.discard" => if ru { "Продолжить" } else { "Discard changes" },
        "dlg.library_title" => if ru { "Библиотека систем" } else { "System library" },
        "dlg.library_empty" => if ru { "Нет сохранённых систем" } else { "No saved systems" },
        "dlg.loading" => if ru { "Загрузка..." } else { "Loading..." },
        "dlg.refresh" => if ru { "Обновить" } else { "Refresh" },
        "dlg.file" => if ru { "Файл" } else { "File" },
        "dlg.open" => if ru { "Открыть" } else { "Open" },
        "dlg.delete" => if ru { "Удалить" } else { "Delete" },
        "dlg.close" => if ru { "Закрыть" } else { "Close" },
        "dlg.no_server" => if ru { "Локальный режим выключен" } else { "Local mode is off" },

        // ── Notifications ───────────────────────────────────
        "note.saved" => if ru { "Сохранено" } else { "Saved" },
        "note.loaded" => if ru { "Загружено" } else { "Loaded" },
        "note.failed" => if ru { "Ошибка" } else { "Failed" },
        "note.invalid" => if ru { "Файл отклонён" } else { "File rejected" },
        "note.sprites" => if ru { "Текстур найдено" } else { "Sprites found" },

        // ── Viewport ────────────────────────────────────────
        "viewport.placeholder" => if ru { "Система не загружена. Создайте или откройте систему." } else { "No system loaded. Create or load a system to begin." },

        // ── Settings window ────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.animation" => if ru { "Анимация" } else { "Animation" },
        "settings.tick_hz" => if ru { "Частота (Гц)" } else { "Tick rate (Hz)" },
        "settings.speed" => if ru { "Множитель скорости" } else { "Speed multiplier" },
        "settings.autoplay" => if ru { "Запускать при открытии" } else { "Animate on open" },
        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.sel_color" => if ru { "Цвет выделения" } else { "Selection color" },
        "settings.fit_padding" => if ru { "Отступ (пикс.)" } else { "Fit padding (px)" },
        "settings.wheel_step" => if ru { "Шаг колеса" } else { "Wheel zoom step" },
        "settings.storage" => if ru { "Хранилище" } else { "Storage" },
        "settings.local_mode" => if ru { "Локальный сервер" } else { "Local server" },
        "settings.api_url" => if ru { "Адрес сервера" } else { "Server URL" },
        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "settings.restore" => if ru { "Восстанавливать последнюю сессию" } else { "Restore last session" },
        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_codes() {
        assert_eq!(Lang::from_code("RU"), Lang::Ru);
        assert_eq!(Lang::from_code("de"), Lang::En);
        assert_eq!(Lang::Ru.code(), "ru");
    }
}
