//! Built-in place tables
//!
//! Korean city and province names with English equivalents for the
//! geocoding fallback, and a list of major Korean cities served locally
//! before the search goes to the network.

use crate::models::LocationInfo;

/// Korean place names the geocoding fallback knows how to retry in English
pub const TRANSLITERATIONS: &[(&str, &str)] = &[
    ("서울", "Seoul"),
    ("부산", "Busan"),
    ("인천", "Incheon"),
    ("대구", "Daegu"),
    ("광주", "Gwangju"),
    ("대전", "Daejeon"),
    ("울산", "Ulsan"),
    ("세종", "Sejong"),
    ("제주", "Jeju"),
    ("경기", "Gyeonggi"),
    ("강원", "Gangwon"),
    ("충북", "Chungbuk"),
    ("충남", "Chungnam"),
    ("전북", "Jeonbuk"),
    ("전남", "Jeonnam"),
    ("경북", "Gyeongbuk"),
    ("경남", "Gyeongnam"),
];

/// English name for an exact Korean place-name match
pub fn english_place_name(query: &str) -> Option<&'static str> {
    TRANSLITERATIONS
        .iter()
        .find(|(korean, _)| *korean == query)
        .map(|(_, english)| *english)
}

struct KnownCity {
    slug: &'static str,
    name: &'static str,
    lat: f64,
    lon: f64,
}

const MAJOR_CITIES: &[KnownCity] = &[
    KnownCity { slug: "seoul", name: "서울", lat: 37.5665, lon: 126.978 },
    KnownCity { slug: "busan", name: "부산", lat: 35.1796, lon: 129.0756 },
    KnownCity { slug: "incheon", name: "인천", lat: 37.4563, lon: 126.7052 },
    KnownCity { slug: "daegu", name: "대구", lat: 35.8714, lon: 128.6014 },
    KnownCity { slug: "gwangju", name: "광주", lat: 35.1595, lon: 126.8526 },
    KnownCity { slug: "daejeon", name: "대전", lat: 36.3504, lon: 127.3845 },
    KnownCity { slug: "ulsan", name: "울산", lat: 35.5384, lon: 129.3114 },
    KnownCity { slug: "sejong", name: "세종", lat: 36.4801, lon: 127.289 },
    KnownCity { slug: "suwon", name: "수원", lat: 37.2636, lon: 127.0286 },
    KnownCity { slug: "jeju", name: "제주", lat: 33.4996, lon: 126.5312 },
    KnownCity { slug: "changwon", name: "창원", lat: 35.227, lon: 128.681 },
    KnownCity { slug: "sokcho", name: "속초", lat: 38.2068, lon: 128.5919 },
    KnownCity { slug: "gangneung", name: "강릉", lat: 37.7519, lon: 128.8761 },
    KnownCity { slug: "chuncheon", name: "춘천", lat: 37.8813, lon: 127.7298 },
    KnownCity { slug: "wonju", name: "원주", lat: 37.342, lon: 127.9201 },
    KnownCity { slug: "cheongju", name: "청주", lat: 36.6425, lon: 127.4891 },
    KnownCity { slug: "chungju", name: "충주", lat: 36.9783, lon: 127.9259 },
    KnownCity { slug: "cheonan", name: "천안", lat: 36.815, lon: 127.1139 },
    KnownCity { slug: "jeonju", name: "전주", lat: 35.8242, lon: 127.148 },
    KnownCity { slug: "gunsan", name: "군산", lat: 35.967, lon: 126.737 },
    KnownCity { slug: "mokpo", name: "목포", lat: 34.8119, lon: 126.3917 },
    KnownCity { slug: "yeosu", name: "여수", lat: 34.7604, lon: 127.6622 },
    KnownCity { slug: "pohang", name: "포항", lat: 36.0319, lon: 129.3644 },
    KnownCity { slug: "gyeongju", name: "경주", lat: 35.8562, lon: 129.2248 },
    KnownCity { slug: "gumi", name: "구미", lat: 36.1134, lon: 128.3393 },
    KnownCity { slug: "gimhae", name: "김해", lat: 35.234, lon: 128.881 },
];

impl KnownCity {
    fn to_location(&self) -> LocationInfo {
        LocationInfo {
            id: format!("kr-{}", self.slug),
            name: self.name.to_string(),
            state: None,
            country: "KR".to_string(),
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// All built-in cities
pub fn major_cities() -> Vec<LocationInfo> {
    MAJOR_CITIES.iter().map(KnownCity::to_location).collect()
}

/// Built-in cities whose name contains the trimmed, lowercased query
pub fn search_major_cities(query: &str) -> Vec<LocationInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    MAJOR_CITIES
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .map(KnownCity::to_location)
        .collect()
}
