use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod expr;
pub mod naming;
pub mod validation;

/// Уникальный идентификатор тела в системе (он же отображаемое имя)
pub type BodyId = String;

/// Версия формата файла системы
pub const FORMAT_VERSION: &str = "1.0";

/// Максимальная длина описания тела
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn default_scale() -> f64 {
    1.0
}

fn default_orbit_speed() -> f64 {
    1.0
}

fn default_luminosity() -> f64 {
    1.0
}

fn default_format_version() -> String {
    FORMAT_VERSION.to_string()
}

/// Тип небесного тела без полезной нагрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Star,
    Planet,
    Moon,
    Station,
    Asteroid,
}

impl BodyType {
    pub const ALL: [BodyType; 5] = [
        BodyType::Star,
        BodyType::Planet,
        BodyType::Moon,
        BodyType::Station,
        BodyType::Asteroid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BodyType::Star => "star",
            BodyType::Planet => "planet",
            BodyType::Moon => "moon",
            BodyType::Station => "station",
            BodyType::Asteroid => "asteroid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for BodyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Тип станции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Research,
    Mining,
    Military,
    Trade,
    Ring,
}

impl StationType {
    pub const ALL: [StationType; 5] = [
        StationType::Research,
        StationType::Mining,
        StationType::Military,
        StationType::Trade,
        StationType::Ring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StationType::Research => "research",
            StationType::Mining => "mining",
            StationType::Military => "military",
            StationType::Trade => "trade",
            StationType::Ring => "ring",
        }
    }

    /// Имя с заглавной буквы, как в идентификаторах ("Research")
    pub fn label(self) -> &'static str {
        match self {
            StationType::Research => "Research",
            StationType::Mining => "Mining",
            StationType::Military => "Military",
            StationType::Trade => "Trade",
            StationType::Ring => "Ring",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }
}

/// Поля, специфичные для типа тела
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum BodyKind {
    Star {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        star_letter: Option<String>,
        #[serde(default = "default_luminosity")]
        luminosity: f64,
    },
    Planet {
        planet_number: u32,
    },
    Moon {
        moon_letter: char,
    },
    Station {
        station_type: StationType,
    },
    Asteroid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        belt_index: Option<u32>,
    },
}

impl BodyKind {
    pub fn body_type(&self) -> BodyType {
        match self {
            BodyKind::Star { .. } => BodyType::Star,
            BodyKind::Planet { .. } => BodyType::Planet,
            BodyKind::Moon { .. } => BodyType::Moon,
            BodyKind::Station { .. } => BodyType::Station,
            BodyKind::Asteroid { .. } => BodyType::Asteroid,
        }
    }
}

/// Небесное тело: общие поля + полезная нагрузка по типу.
///
/// Позиция задаётся круговой орбитой вокруг родителя:
/// `parent + (cos(angle), sin(angle)) * orbit_distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: BodyKind,
    #[serde(default)]
    pub sprite: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub rotation_speed: f64,
    #[serde(default)]
    pub parent_id: Option<BodyId>,
    #[serde(default)]
    pub orbit_distance: f64,
    #[serde(default = "default_orbit_speed")]
    pub orbit_speed: f64,
    #[serde(default)]
    pub orbit_angle: f64,
    #[serde(default)]
    pub children: Vec<CelestialBody>,

    // Визуальные переопределения; отсутствие = значения по типу
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_ring_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_ring_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ring_only: Option<bool>,
}

impl CelestialBody {
    pub fn body_type(&self) -> BodyType {
        self.kind.body_type()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Число тел в поддереве, включая само тело
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Идентификаторы поддерева в порядке обхода в глубину
    pub fn subtree_ids(&self) -> Vec<BodyId> {
        let mut out = Vec::with_capacity(self.subtree_len());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<BodyId>) {
        out.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    pub fn planet_number(&self) -> Option<u32> {
        match self.kind {
            BodyKind::Planet { planet_number } => Some(planet_number),
            _ => None,
        }
    }

    pub fn moon_letter(&self) -> Option<char> {
        match self.kind {
            BodyKind::Moon { moon_letter } => Some(moon_letter),
            _ => None,
        }
    }

    pub fn station_type(&self) -> Option<StationType> {
        match self.kind {
            BodyKind::Station { station_type } => Some(station_type),
            _ => None,
        }
    }
}

/// Размеры системы
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
        }
    }
}

/// Метаданные системы (без тел)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bounds: Bounds,
}

/// Документ системы: то, что пишется в JSON, в ZIP и передаётся по API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemFile {
    #[serde(default = "default_format_version")]
    pub format_version: String,
    pub system: SolarSystem,
    #[serde(default)]
    pub root_bodies: Vec<CelestialBody>,
}

impl SystemFile {
    pub fn new(system: SolarSystem, root_bodies: Vec<CelestialBody>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            system,
            root_bodies,
        }
    }

    /// Все имена спрайтов, используемые телами (без повторов, по порядку)
    pub fn used_sprites(&self) -> Vec<String> {
        fn walk(body: &CelestialBody, out: &mut Vec<String>) {
            if !body.sprite.is_empty() && !out.contains(&body.sprite) {
                out.push(body.sprite.clone());
            }
            for child in &body.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for root in &self.root_bodies {
            walk(root, &mut out);
        }
        out
    }
}

/// Элемент списка систем в локальном режиме
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEntry {
    pub filename: String,
    pub name: String,
}

/// Ответ `GET /api/systems`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemList {
    pub systems: Vec<SystemEntry>,
}

/// Ответ `GET /api/sprites`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteList {
    pub sprites: Vec<String>,
}

/// Ответ на сохранение системы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub filename: String,
}

/// Ответ API с ошибкой
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(id: &str, parent: &str, n: u32) -> CelestialBody {
        CelestialBody {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            kind: BodyKind::Planet { planet_number: n },
            sprite: String::new(),
            scale: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            parent_id: Some(parent.to_string()),
            orbit_distance: 100.0,
            orbit_speed: 1.0,
            orbit_angle: 0.0,
            children: Vec::new(),
            base_size: None,
            fallback_color: None,
            orbit_ring_color: None,
            orbit_ring_width: None,
            is_ring_only: None,
        }
    }

    #[test]
    fn test_body_type_serde() {
        assert_eq!(serde_json::to_string(&BodyType::Asteroid).unwrap(), "\"asteroid\"");
        let t: BodyType = serde_json::from_str("\"station\"").unwrap();
        assert_eq!(t, BodyType::Station);
    }

    #[test]
    fn test_body_kind_flattened_into_body() {
        let body = planet("Sol 1", "Sol", 1);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "planet");
        assert_eq!(json["planetNumber"], 1);
        assert_eq!(json["parentId"], "Sol");
        assert_eq!(json["orbitDistance"], 100.0);
        assert!(json.get("baseSize").is_none());
    }

    #[test]
    fn test_deserialize_star_with_defaults() {
        let json = r#"{"id":"Sol","name":"Sol","type":"star","parentId":null}"#;
        let body: CelestialBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.body_type(), BodyType::Star);
        assert_eq!(body.scale, 1.0);
        assert_eq!(body.orbit_speed, 1.0);
        assert!(body.children.is_empty());
        match body.kind {
            BodyKind::Star { star_letter, luminosity } => {
                assert_eq!(star_letter, None);
                assert_eq!(luminosity, 1.0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_moon_letter() {
        let json = r#"{"id":"Sol 3 a","name":"Luna","type":"moon","moonLetter":"a","parentId":"Sol 3","orbitDistance":30}"#;
        let body: CelestialBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.moon_letter(), Some('a'));
        assert_eq!(body.orbit_distance, 30.0);
    }

    #[test]
    fn test_deserialize_multi_char_moon_letter_fails() {
        let json = r#"{"id":"x","name":"x","type":"moon","moonLetter":"ab"}"#;
        assert!(serde_json::from_str::<CelestialBody>(json).is_err());
    }

    #[test]
    fn test_deserialize_unknown_type_fails() {
        let json = r#"{"id":"x","name":"x","type":"comet"}"#;
        assert!(serde_json::from_str::<CelestialBody>(json).is_err());
    }

    #[test]
    fn test_station_type_parse() {
        assert_eq!(StationType::parse("Mining"), Some(StationType::Mining));
        assert_eq!(StationType::parse("trade"), Some(StationType::Trade));
        assert_eq!(StationType::parse("dock"), None);
        assert_eq!(StationType::Ring.label(), "Ring");
    }

    #[test]
    fn test_subtree_ids_depth_first() {
        let mut p = planet("Sol 1", "Sol", 1);
        let mut m = planet("Sol 1 a", "Sol 1", 1);
        m.kind = BodyKind::Moon { moon_letter: 'a' };
        p.children.push(m);
        assert_eq!(p.subtree_ids(), vec!["Sol 1".to_string(), "Sol 1 a".to_string()]);
        assert_eq!(p.subtree_len(), 2);
    }

    #[test]
    fn test_system_file_roundtrip_and_sprites() {
        let mut p = planet("Sol 1", "Sol", 1);
        p.sprite = "earth.png".into();
        let mut q = planet("Sol 2", "Sol", 2);
        q.sprite = "earth.png".into();
        let file = SystemFile::new(
            SolarSystem {
                id: "s".into(),
                name: "Sol".into(),
                bounds: Bounds::default(),
            },
            vec![p, q],
        );
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"formatVersion\":\"1.0\""));
        assert!(json.contains("\"rootBodies\""));
        let back: SystemFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
        assert_eq!(back.used_sprites(), vec!["earth.png".to_string()]);
    }

    #[test]
    fn test_system_bounds_default() {
        let sys: SolarSystem = serde_json::from_str(r#"{"id":"a","name":"A"}"#).unwrap();
        assert_eq!(sys.bounds, Bounds { width: 2000.0, height: 2000.0 });
    }
}
