//! Схема именования тел в стиле Elite Dangerous.
//!
//! `Sol`, `Sol A` (звёзды), `Sol 1`, `Sol A 2` (планеты), `Sol 3 a` (луны),
//! `Sol Belt 1` (пояса), `Sol 3 Research 1` (станции).

use crate::StationType;

/// Буква компаньона для индекса звезды (1 -> 'A'); у главной звезды буквы нет
pub fn star_letter(star_index: usize) -> Option<char> {
    if star_index == 0 || star_index > 26 {
        return None;
    }
    Some((b'A' + (star_index - 1) as u8) as char)
}

/// Буква луны по индексу (0 -> 'a')
pub fn moon_letter(moon_index: usize) -> Option<char> {
    if moon_index >= 26 {
        return None;
    }
    Some((b'a' + moon_index as u8) as char)
}

/// Индекс луны по её букве ('a' -> 0)
pub fn moon_index(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter as u8 - b'a') as usize)
}

/// `Sol` для главной звезды, `Sol A`, `Sol B`... для компаньонов
pub fn star_id(system_name: &str, star_index: usize) -> String {
    match star_letter(star_index) {
        Some(letter) => format!("{} {}", system_name, letter),
        None => system_name.to_string(),
    }
}

/// `Sol 3` для планеты главной звезды, `Sol B 2` для компаньона
pub fn planet_id(system_name: &str, star_id: &str, planet_number: u32) -> String {
    if star_id == system_name {
        return format!("{} {}", system_name, planet_number);
    }
    match star_id
        .strip_prefix(system_name)
        .map(str::trim)
        .filter(|suffix| !suffix.is_empty())
    {
        Some(suffix) => format!("{} {} {}", system_name, suffix, planet_number),
        None => format!("{} {}", system_name, planet_number),
    }
}

pub fn moon_id(planet_id: &str, letter: char) -> String {
    format!("{} {}", planet_id, letter)
}

pub fn asteroid_belt_id(system_name: &str, belt_index: u32) -> String {
    format!("{} Belt {}", system_name, belt_index)
}

pub fn station_id(parent_id: &str, station_type: StationType, station_index: u32) -> String {
    format!("{} {} {}", parent_id, station_type.label(), station_index)
}

/// Разобранный идентификатор
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedId {
    pub system_name: String,
    pub star_letter: Option<char>,
    pub planet_number: Option<u32>,
    pub moon_letter: Option<char>,
    pub station_type: Option<StationType>,
    pub station_index: Option<u32>,
}

/// Разобрать идентификатор на компоненты.
///
/// Имя системы считается первым словом, поэтому для многословных имён
/// результат неполный.
pub fn parse_id(id: &str) -> ParsedId {
    let mut parts: Vec<&str> = id.split(' ').collect();
    let mut parsed = ParsedId {
        system_name: parts.first().copied().unwrap_or_default().to_string(),
        ..ParsedId::default()
    };
    if parts.len() == 1 {
        return parsed;
    }

    if let Some(c) = single_char(parts[1]).filter(|c| c.is_ascii_uppercase()) {
        parsed.star_letter = Some(c);
        parts.remove(1);
    }

    let Some(number) = parts.get(1).and_then(|p| parse_number(p)) else {
        return parsed;
    };
    parsed.planet_number = Some(number);

    if let Some(p) = parts.get(2) {
        if let Some(c) = single_char(p).filter(|c| c.is_ascii_lowercase()) {
            parsed.moon_letter = Some(c);
        } else if let Some(station_type) = StationType::ALL.into_iter().find(|t| t.label() == *p)
        {
            parsed.station_type = Some(station_type);
            parsed.station_index = parts.get(3).and_then(|p| parse_number(p));
        }
    }
    parsed
}

/// Имя файла для системы: нижний регистр, пробелы и разделители путей
/// заменены дефисами, ведущие точки и дефисы отброшены
pub fn file_stem(system_name: &str) -> String {
    let stem = system_name
        .replace(['/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    let stem = stem.trim_start_matches(['.', '-']);
    if stem.is_empty() {
        "system".to_string()
    } else {
        stem.to_string()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_star_ids() {
        assert_eq!(star_id("Sol", 0), "Sol");
        assert_eq!(star_id("Sol", 1), "Sol A");
        assert_eq!(star_id("Sol", 2), "Sol B");
    }

    #[test]
    fn test_planet_ids() {
        assert_eq!(planet_id("Sol", "Sol", 3), "Sol 3");
        assert_eq!(planet_id("Sol", "Sol B", 2), "Sol B 2");
    }

    #[test]
    fn test_moon_belt_station_ids() {
        assert_eq!(moon_id("Sol 3", 'a'), "Sol 3 a");
        assert_eq!(asteroid_belt_id("Sol", 1), "Sol Belt 1");
        assert_eq!(station_id("Sol 3", StationType::Research, 1), "Sol 3 Research 1");
        assert_eq!(station_id("Sol 3 a", StationType::Mining, 2), "Sol 3 a Mining 2");
    }

    #[test]
    fn test_letters() {
        assert_eq!(moon_letter(0), Some('a'));
        assert_eq!(moon_letter(25), Some('z'));
        assert_eq!(moon_letter(26), None);
        assert_eq!(moon_index('c'), Some(2));
        assert_eq!(moon_index('C'), None);
        assert_eq!(star_letter(0), None);
        assert_eq!(star_letter(1), Some('A'));
    }

    #[test]
    fn test_parse_star() {
        let p = parse_id("Sol");
        assert_eq!(p.system_name, "Sol");
        assert_eq!(p.planet_number, None);

        let p = parse_id("Sol B");
        assert_eq!(p.star_letter, Some('B'));
    }

    #[test]
    fn test_parse_planet_and_moon() {
        let p = parse_id("Sol 3 a");
        assert_eq!(p.planet_number, Some(3));
        assert_eq!(p.moon_letter, Some('a'));

        let p = parse_id("Sol A 2");
        assert_eq!(p.star_letter, Some('A'));
        assert_eq!(p.planet_number, Some(2));
    }

    #[test]
    fn test_parse_station() {
        let p = parse_id("Sol 3 Research 1");
        assert_eq!(p.planet_number, Some(3));
        assert_eq!(p.moon_letter, None);
        assert_eq!(p.station_type, Some(StationType::Research));
        assert_eq!(p.station_index, Some(1));
    }

    #[test]
    fn test_parse_belt_is_just_system() {
        let p = parse_id("Sol Belt 1");
        assert_eq!(p.system_name, "Sol");
        assert_eq!(p.planet_number, None);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Alpha  Centauri"), "alpha-centauri");
        assert_eq!(file_stem("Sol"), "sol");
        assert_eq!(file_stem("   "), "system");
    }

    #[test]
    fn test_file_stem_strips_path_parts() {
        assert_eq!(file_stem("../escaped"), "escaped");
        assert_eq!(file_stem("..\\..\\win"), "win");
        assert_eq!(file_stem("a/b"), "a-b");
        assert_eq!(file_stem(".."), "system");
        assert_eq!(file_stem(".hidden"), "hidden");
    }

    #[test]
    fn test_planet_ids_multi_word_system() {
        let star = star_id("Alpha Centauri", 1);
        assert_eq!(star, "Alpha Centauri A");
        assert_eq!(planet_id("Alpha Centauri", &star, 1), "Alpha Centauri A 1");
        assert_eq!(
            planet_id("Alpha Centauri", "Alpha Centauri", 2),
            "Alpha Centauri 2"
        );
    }

    proptest! {
        #[test]
        fn planet_id_parses_back(n in 1u32..10_000, star in 0usize..4) {
            let star = star_id("Sol", star);
            let parsed = parse_id(&planet_id("Sol", &star, n));
            prop_assert_eq!(parsed.system_name, "Sol");
            prop_assert_eq!(parsed.planet_number, Some(n));
        }
    }
}
