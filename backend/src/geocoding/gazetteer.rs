//! Offline gazetteer of major cities.

use async_trait::async_trait;

use super::{GeoLocation, GeocodeError, Geocoder};

/// One gazetteer row: name, aliases, country, lat, lon (east positive), zone.
struct Place {
    name: &'static str,
    aliases: &'static [&'static str],
    country: &'static str,
    latitude: f64,
    longitude: f64,
    timezone: &'static str,
}

const fn place(
    name: &'static str,
    aliases: &'static [&'static str],
    country: &'static str,
    latitude: f64,
    longitude: f64,
    timezone: &'static str,
) -> Place {
    Place {
        name,
        aliases,
        country,
        latitude,
        longitude,
        timezone,
    }
}

static PLACES: &[Place] = &[
    place("London", &[], "GB", 51.5074, -0.1278, "Europe/London"),
    place("Manchester", &[], "GB", 53.4808, -2.2426, "Europe/London"),
    place("Edinburgh", &[], "GB", 55.9533, -3.1883, "Europe/London"),
    place("Dublin", &[], "IE", 53.3498, -6.2603, "Europe/Dublin"),
    place("Paris", &[], "FR", 48.8566, 2.3522, "Europe/Paris"),
    place("Berlin", &[], "DE", 52.5200, 13.4050, "Europe/Berlin"),
    place("Munich", &["München"], "DE", 48.1351, 11.5820, "Europe/Berlin"),
    place("Rome", &["Roma"], "IT", 41.9028, 12.4964, "Europe/Rome"),
    place("Milan", &["Milano"], "IT", 45.4642, 9.1900, "Europe/Rome"),
    place("Madrid", &[], "ES", 40.4168, -3.7038, "Europe/Madrid"),
    place("Barcelona", &[], "ES", 41.3874, 2.1686, "Europe/Madrid"),
    place("Lisbon", &["Lisboa"], "PT", 38.7223, -9.1393, "Europe/Lisbon"),
    place("Amsterdam", &[], "NL", 52.3676, 4.9041, "Europe/Amsterdam"),
    place("Brussels", &["Bruxelles"], "BE", 50.8503, 4.3517, "Europe/Brussels"),
    place("Vienna", &["Wien"], "AT", 48.2082, 16.3738, "Europe/Vienna"),
    place("Zurich", &["Zürich"], "CH", 47.3769, 8.5417, "Europe/Zurich"),
    place("Stockholm", &[], "SE", 59.3293, 18.0686, "Europe/Stockholm"),
    place("Oslo", &[], "NO", 59.9139, 10.7522, "Europe/Oslo"),
    place("Copenhagen", &["København"], "DK", 55.6761, 12.5683, "Europe/Copenhagen"),
    place("Helsinki", &[], "FI", 60.1699, 24.9384, "Europe/Helsinki"),
    place("Reykjavik", &["Reykjavík"], "IS", 64.1466, -21.9426, "Atlantic/Reykjavik"),
    place("Warsaw", &["Warszawa"], "PL", 52.2297, 21.0122, "Europe/Warsaw"),
    place("Prague", &["Praha"], "CZ", 50.0755, 14.4378, "Europe/Prague"),
    place("Budapest", &[], "HU", 47.4979, 19.0402, "Europe/Budapest"),
    place("Athens", &["Athina"], "GR", 37.9838, 23.7275, "Europe/Athens"),
    place("Istanbul", &["İstanbul"], "TR", 41.0082, 28.9784, "Europe/Istanbul"),
    place("Moscow", &["Moskva"], "RU", 55.7558, 37.6173, "Europe/Moscow"),
    place("Tromso", &["Tromsø"], "NO", 69.6492, 18.9553, "Europe/Oslo"),
    place("Cairo", &[], "EG", 30.0444, 31.2357, "Africa/Cairo"),
    place("Lagos", &[], "NG", 6.5244, 3.3792, "Africa/Lagos"),
    place("Nairobi", &[], "KE", -1.2921, 36.8219, "Africa/Nairobi"),
    place("Johannesburg", &[], "ZA", -26.2041, 28.0473, "Africa/Johannesburg"),
    place("Dubai", &[], "AE", 25.2048, 55.2708, "Asia/Dubai"),
    place("Tehran", &[], "IR", 35.6892, 51.3890, "Asia/Tehran"),
    place("Mumbai", &["Bombay"], "IN", 19.0760, 72.8777, "Asia/Kolkata"),
    place("New Delhi", &["Delhi"], "IN", 28.6139, 77.2090, "Asia/Kolkata"),
    place("Kolkata", &["Calcutta"], "IN", 22.5726, 88.3639, "Asia/Kolkata"),
    place("Bangkok", &[], "TH", 13.7563, 100.5018, "Asia/Bangkok"),
    place("Singapore", &[], "SG", 1.3521, 103.8198, "Asia/Singapore"),
    place("Jakarta", &[], "ID", -6.2088, 106.8456, "Asia/Jakarta"),
    place("Beijing", &["Peking"], "CN", 39.9042, 116.4074, "Asia/Shanghai"),
    place("Shanghai", &[], "CN", 31.2304, 121.4737, "Asia/Shanghai"),
    place("Guangzhou", &["Canton"], "CN", 23.1291, 113.2644, "Asia/Shanghai"),
    place("Hong Kong", &[], "HK", 22.3193, 114.1694, "Asia/Hong_Kong"),
    place("Taipei", &[], "TW", 25.0330, 121.5654, "Asia/Taipei"),
    place("Seoul", &[], "KR", 37.5665, 126.9780, "Asia/Seoul"),
    place("Tokyo", &[], "JP", 35.6762, 139.6503, "Asia/Tokyo"),
    place("Sydney", &[], "AU", -33.8688, 151.2093, "Australia/Sydney"),
    place("Melbourne", &[], "AU", -37.8136, 144.9631, "Australia/Melbourne"),
    place("Auckland", &[], "NZ", -36.8485, 174.7633, "Pacific/Auckland"),
    place("Honolulu", &[], "US", 21.3069, -157.8583, "Pacific/Honolulu"),
    place("Los Angeles", &["LA"], "US", 34.0522, -118.2437, "America/Los_Angeles"),
    place("San Francisco", &[], "US", 37.7749, -122.4194, "America/Los_Angeles"),
    place("Chicago", &[], "US", 41.8781, -87.6298, "America/Chicago"),
    place("New York", &["New York City", "NYC"], "US", 40.7128, -74.0060, "America/New_York"),
    place("Toronto", &[], "CA", 43.6532, -79.3832, "America/Toronto"),
    place("Vancouver", &[], "CA", 49.2827, -123.1207, "America/Vancouver"),
    place("Mexico City", &["Ciudad de México"], "MX", 19.4326, -99.1332, "America/Mexico_City"),
    place("Coyoacán", &[], "MX", 19.3467, -99.1617, "America/Mexico_City"),
    place("Bogota", &["Bogotá"], "CO", 4.7110, -74.0721, "America/Bogota"),
    place("Lima", &[], "PE", -12.0464, -77.0428, "America/Lima"),
    place("Sao Paulo", &["São Paulo"], "BR", -23.5505, -46.6333, "America/Sao_Paulo"),
    place("Rio de Janeiro", &[], "BR", -22.9068, -43.1729, "America/Sao_Paulo"),
    place("Buenos Aires", &[], "AR", -34.6037, -58.3816, "America/Argentina/Buenos_Aires"),
    place("Santiago", &[], "CL", -33.4489, -70.6693, "America/Santiago"),
];

/// Lowercase and strip common Latin diacritics so `Zürich` matches `zurich`.
fn fold(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' | 'ı' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            '-' | '_' => ' ',
            other => other,
        })
        .filter(|c| *c != '\u{307}')
        .collect()
}

/// Built-in offline geocoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gazetteer;

impl Gazetteer {
    pub fn new() -> Self {
        Gazetteer
    }

    /// Number of known places.
    pub fn len(&self) -> usize {
        PLACES.len()
    }

    pub fn is_empty(&self) -> bool {
        PLACES.is_empty()
    }

    /// Synchronous lookup used by the async trait impl.
    pub fn lookup(&self, city: &str, nation: Option<&str>) -> Option<GeoLocation> {
        let wanted = fold(city);
        if wanted.is_empty() {
            return None;
        }
        let nation = nation.map(str::trim).filter(|n| !n.is_empty());
        PLACES
            .iter()
            .filter(|p| nation.map_or(true, |n| p.country.eq_ignore_ascii_case(n)))
            .find(|p| fold(p.name) == wanted || p.aliases.iter().any(|a| fold(a) == wanted))
            .map(|p| GeoLocation {
                name: p.name.to_string(),
                country_code: p.country.to_string(),
                latitude: p.latitude,
                longitude: p.longitude,
                timezone: p.timezone.to_string(),
            })
    }
}

#[async_trait]
impl Geocoder for Gazetteer {
    async fn resolve(&self, city: &str, nation: Option<&str>) -> Result<GeoLocation, GeocodeError> {
        self.lookup(city, nation)
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_accent_insensitive() {
        let g = Gazetteer::new();
        assert_eq!(g.lookup("zurich", None).unwrap().name, "Zurich");
        assert_eq!(g.lookup("  ZÜRICH ", None).unwrap().timezone, "Europe/Zurich");
        assert_eq!(g.lookup("coyoacan", None).unwrap().country_code, "MX");
    }

    #[test]
    fn test_lookup_by_alias() {
        let g = Gazetteer::new();
        assert_eq!(g.lookup("Bombay", None).unwrap().name, "Mumbai");
        assert_eq!(g.lookup("nyc", None).unwrap().timezone, "America/New_York");
    }

    #[test]
    fn test_nation_filter() {
        let g = Gazetteer::new();
        assert!(g.lookup("London", Some("GB")).is_some());
        assert!(g.lookup("London", Some("us")).is_none());
        assert!(g.lookup("London", Some("")).is_some());
    }

    #[test]
    fn test_unknown_city() {
        assert!(Gazetteer::new().lookup("Atlantis", None).is_none());
        assert!(Gazetteer::new().lookup("   ", None).is_none());
    }

    #[test]
    fn test_every_zone_parses() {
        for place in PLACES {
            assert!(
                place.timezone.parse::<chrono_tz::Tz>().is_ok(),
                "{}",
                place.timezone
            );
            assert!(place.latitude.abs() < 90.0 && place.longitude.abs() <= 180.0);
        }
    }

    #[tokio::test]
    async fn test_resolve_not_found_names_city() {
        let err = Gazetteer::new().resolve("Atlantis", None).await.unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }
}
