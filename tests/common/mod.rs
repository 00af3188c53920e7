use geocluster::Options;
use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};

/// Route load-time debug output through the test harness.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn options(radius: f64, extent: f64, min_points: u8, max_zoom: u8) -> Options {
    Options {
        radius,
        extent,
        min_points,
        max_zoom,
        ..Options::default()
    }
}

#[allow(dead_code)]
pub fn point(lng: f64, lat: f64) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lng, lat]))),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

#[allow(dead_code)]
pub fn point_with_properties(lng: f64, lat: f64, properties: JsonObject) -> Feature {
    Feature {
        properties: Some(properties),
        ..point(lng, lat)
    }
}

/// A point tagged with its input index, so leaves can be traced back.
#[allow(dead_code)]
pub fn indexed_point(index: usize, lng: f64, lat: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("idx".to_string(), JsonValue::from(index));

    point_with_properties(lng, lat, properties)
}

/// A point carrying a reducible "value" property.
#[allow(dead_code)]
pub fn valued_point(lng: f64, lat: f64, value: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("value".to_string(), JsonValue::from(value));

    point_with_properties(lng, lat, properties)
}

/// Deterministic pseudo-random features spread over the inhabitable world.
#[allow(dead_code)]
pub fn scattered_features(n: usize) -> Vec<Feature> {
    let mut state: u64 = 0x2545f4914f6cdd1d;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 1_000_000) as f64 / 1_000_000.0
    };

    (0..n)
        .map(|i| {
            let lng = next() * 360.0 - 180.0;
            let lat = next() * 160.0 - 80.0;

            indexed_point(i, lng, lat)
        })
        .collect()
}
