use serde::{Deserialize, Serialize};

/// Options accepted by `install`.
///
/// The host page passes a plain JS object (or `null`/`undefined` for the
/// defaults); it is round-tripped through JSON so serde does the parsing
/// and default-filling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InstallOptions {
    /// Id of a host element that receives a smoothed frame-time readout.
    pub stats: Option<String>,
    /// Ball radius in world units.
    pub radius: f32,
    /// Latitude/longitude resolution of the tile grid.
    pub bands: u32,
    /// Color multiplier applied to every mirror tile. Values above 1
    /// overdrive the environment reflections.
    pub tint: [f32; 3],
    /// Whether the ball spins on its own (toggled at runtime with J).
    pub rotate: bool,
    /// Index of the starting environment palette (wraps).
    pub environment: usize,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            stats: None,
            radius: 10.0,
            bands: 128,
            tint: [4.0, 4.0, 4.0],
            rotate: true,
            environment: 0,
        }
    }
}

#[cfg(target_family = "wasm")]
impl InstallOptions {
    pub(crate) fn from_js(value: &wasm_bindgen::JsValue) -> Result<Self, wasm_bindgen::JsValue> {
        if value.is_null() || value.is_undefined() {
            return Ok(Self::default());
        }
        let json = js_sys::JSON::stringify(value)?;
        let json = String::from(json);
        serde_json::from_str(&json).map_err(|e| {
            wasm_bindgen::JsValue::from_str(&format!("discoball: invalid install options: {e}"))
        })
    }

    pub(crate) fn to_js(&self) -> Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue> {
        let json = serde_json::to_string(self)
            .map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))?;
        js_sys::JSON::parse(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_ball() {
        let opts = InstallOptions::default();
        assert_eq!(opts.radius, 10.0);
        assert_eq!(opts.bands, 128);
        assert_eq!(opts.tint, [4.0, 4.0, 4.0]);
        assert!(opts.rotate);
        assert_eq!(opts.environment, 0);
        assert!(opts.stats.is_none());
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let opts: InstallOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, InstallOptions::default());
    }

    #[test]
    fn partial_objects_keep_remaining_defaults() {
        let opts: InstallOptions =
            serde_json::from_str(r#"{"stats": "fps", "bands": 64}"#).unwrap();
        assert_eq!(opts.stats.as_deref(), Some("fps"));
        assert_eq!(opts.bands, 64);
        assert_eq!(opts.radius, 10.0);
        assert!(opts.rotate);
    }

    #[test]
    fn full_objects_round_trip() {
        let opts = InstallOptions {
            stats: Some("readout".to_owned()),
            radius: 2.5,
            bands: 32,
            tint: [1.0, 2.0, 3.0],
            rotate: false,
            environment: 3,
        };
        let json = serde_json::to_string(&opts).unwrap();
        let parsed: InstallOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, opts);
    }
}
