//! Static geography tables for the globe renderer.
//!
//! The renderer identifies country polygons by ISO 3166-1 numeric code and
//! places markers at approximate centroids.  Missing entries are not errors:
//! they only mean "no marker" / "no highlight" for that country.

use serde::Serialize;

use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub country_code: String,
    pub lat: f64,
    pub lng: f64,
}

/// ISO 3166-1 numeric → alpha-2 for the Americas.
static NUMERIC_TO_ALPHA: &[(u16, &str)] = &[
    (28, "AG"),
    (32, "AR"),
    (44, "BS"),
    (52, "BB"),
    (60, "BM"),
    (68, "BO"),
    (74, "BV"),
    (76, "BR"),
    (84, "BZ"),
    (92, "VG"),
    (124, "CA"),
    (136, "KY"),
    (152, "CL"),
    (170, "CO"),
    (188, "CR"),
    (192, "CU"),
    (212, "DM"),
    (214, "DO"),
    (218, "EC"),
    (222, "SV"),
    (238, "FK"),
    (239, "GS"),
    (254, "GF"),
    (304, "GL"),
    (308, "GD"),
    (312, "GP"),
    (320, "GT"),
    (328, "GY"),
    (332, "HT"),
    (340, "HN"),
    (388, "JM"),
    (474, "MQ"),
    (484, "MX"),
    (500, "MS"),
    (531, "CW"),
    (533, "AW"),
    (534, "SX"),
    (535, "BQ"),
    (558, "NI"),
    (581, "UM"),
    (591, "PA"),
    (600, "PY"),
    (604, "PE"),
    (630, "PR"),
    (652, "BL"),
    (659, "KN"),
    (660, "AI"),
    (662, "LC"),
    (663, "MF"),
    (666, "PM"),
    (670, "VC"),
    (740, "SR"),
    (780, "TT"),
    (796, "TC"),
    (840, "US"),
    (850, "VI"),
    (858, "UY"),
    (862, "VE"),
];

/// Approximate geographic centre (or capital) per alpha-2 code.
static CENTROIDS: &[(&str, f64, f64)] = &[
    ("AG", 17.0608, -61.7964),
    ("AI", 18.2206, -63.0686),
    ("AR", -34.6037, -58.3816),
    ("AW", 12.5211, -69.9683),
    ("BB", 13.1939, -59.5432),
    ("BL", 17.9, -62.8333),
    ("BM", 32.3078, -64.7505),
    ("BO", -16.2902, -63.5887),
    ("BR", -15.7939, -47.8828),
    ("BS", 25.0258, -78.0359),
    ("BV", -54.4208, 3.3464),
    ("BZ", 17.5046, -88.1962),
    ("CA", 56.1304, -106.3468),
    ("CL", -33.4489, -70.6693),
    ("CO", 4.5709, -74.2973),
    ("CR", 9.7489, -83.7534),
    ("CU", 21.5218, -77.7812),
    ("CW", 12.1696, -68.99),
    ("DM", 15.4149, -61.3709),
    ("DO", 18.7357, -70.1627),
    ("EC", -1.8312, -78.1834),
    ("FK", -51.7963, -59.5236),
    ("GD", 12.1165, -61.679),
    ("GF", 3.9339, -53.1258),
    ("GL", 64.1835, -51.7216),
    ("GP", 16.265, -61.551),
    ("GS", -54.4069, -36.5879),
    ("GT", 14.6349, -90.5069),
    ("GY", 4.8604, -58.9302),
    ("HN", 15.199, -86.2419),
    ("HT", 18.9712, -72.2852),
    ("JM", 18.1096, -77.2975),
    ("KN", 17.3578, -62.7829),
    ("KY", 19.3133, -81.2546),
    ("LC", 13.9094, -60.9789),
    ("MF", 18.0708, -63.0501),
    ("MQ", 14.6415, -61.0242),
    ("MS", 16.7425, -62.1874),
    ("MX", 23.6345, -102.5528),
    ("NI", 12.8654, -85.2072),
    ("PA", 8.5379, -80.7821),
    ("PE", -9.1899, -75.0151),
    ("PM", 46.9419, -56.2711),
    ("PR", 18.2208, -66.5901),
    ("PY", -23.4425, -58.4438),
    ("SR", 3.9193, -56.0278),
    ("SV", 13.7942, -88.8965),
    ("SX", 18.0425, -63.0548),
    ("TC", 21.694, -71.7979),
    ("TT", 10.6918, -61.2225),
    ("US", 37.0902, -95.7129),
    ("UY", -32.5228, -55.7658),
    ("VC", 12.9843, -61.2872),
    ("VE", 6.4238, -66.5897),
    ("VG", 18.4207, -64.64),
    ("VI", 18.3358, -64.8963),
];

pub fn alpha2_from_numeric(numeric: u16) -> Option<&'static str> {
    NUMERIC_TO_ALPHA
        .binary_search_by_key(&numeric, |&(n, _)| n)
        .ok()
        .map(|idx| NUMERIC_TO_ALPHA[idx].1)
}

pub fn centroid(alpha2: &str) -> Option<Centroid> {
    CENTROIDS
        .iter()
        .find(|(code, _, _)| *code == alpha2)
        .map(|&(_, lat, lng)| Centroid { lat, lng })
}

/// One marker per catalog country that has a centroid, in catalog order.
pub fn markers(catalog: &Catalog) -> Vec<Marker> {
    catalog
        .countries()
        .iter()
        .filter_map(|c| {
            centroid(&c.code).map(|p| Marker {
                country_code: c.code.clone(),
                lat: p.lat,
                lng: p.lng,
            })
        })
        .collect()
}

/// Whether a renderer polygon id belongs to the catalog's region.
pub fn region_contains_numeric(catalog: &Catalog, numeric: u16) -> bool {
    alpha2_from_numeric(numeric)
        .is_some_and(|code| catalog.region().country_codes.iter().any(|c| c == code))
}
