//! This example drives a viewer without a window: layers come from a style document, a few
//! features are placed on the canvas and synthetic UI events toggle layers and open popups.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use reinfo_map::control::UiEvent;
use reinfo_map::engine::{LayerCollection, MapEngine, PopupDisplay};
use reinfo_map::feature::{FeatureGeometry, RenderedFeature};
use reinfo_map::popup::Popup;
use reinfo_map::style::StyleDocument;
use reinfo_map::{Viewer, ViewerConfig};
use reinfo_map_types::{latlon, Properties, ScreenPoint, ScreenRect};

const STYLE: &str = r#"{
    "version": 8,
    "name": "mono",
    "layers": [
        {"id": "XPT001", "type": "circle", "source": "reinfolib", "source-layer": "XPT001"},
        {"id": "XKT001", "type": "fill", "source": "reinfolib", "source-layer": "XKT001"},
        {"id": "XKT003", "type": "fill", "source": "reinfolib", "source-layer": "XKT003"},
        {"id": "XKT003-line", "type": "line", "source": "reinfolib", "source-layer": "XKT003"}
    ]
}"#;

/// Prints popups instead of drawing them.
struct ConsoleDisplay;

impl PopupDisplay for ConsoleDisplay {
    fn show_popup(&mut self, popup: Popup) {
        println!(
            "popup at {:.5}, {:.5} (max width {})",
            popup.report.anchor.lat(),
            popup.report.anchor.lon(),
            popup.options.max_width
        );
        print!("{}", popup.report);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let style = StyleDocument::from_json_str(STYLE)?;
    let mut collection = LayerCollection::from_style(&style);

    let station: Properties = serde_json::from_str(
        r#"{"駅名": "所沢", "事業者名": "西武鉄道", "乗降客数": 96966}"#,
    )?;
    collection.insert_feature(
        RenderedFeature::point("XPT001", station, latlon!(35.78689, 139.47304)),
        Some(ScreenRect::around(ScreenPoint::new(320.0, 240.0), 6.0)),
    )?;

    for (name, ratio) in [("第一種住居地域", 60), ("近隣商業地域", 80)] {
        let zone: Properties = [
            ("用途地域", name.into()),
            ("建ぺい率", reinfo_map_types::PropertyValue::Integer(ratio)),
        ]
        .into_iter()
        .collect();
        collection.insert_feature(
            RenderedFeature::new("XKT001", zone, FeatureGeometry::Other),
            None,
        )?;
    }

    let engine = Arc::new(RwLock::new(collection));
    let display = Arc::new(Mutex::new(ConsoleDisplay));
    let mut viewer = Viewer::new(ViewerConfig::reinfolib(), engine.clone(), display)?;
    viewer.on_load()?;

    println!("camera: {}", viewer.hash().unwrap_or_default());

    viewer.dispatch(&UiEvent::click(
        ScreenPoint::new(321.0, 238.0),
        latlon!(35.78701, 139.47299),
    ));

    viewer.dispatch(&UiEvent::input_changed("xkt003", false));
    println!(
        "XKT003-line visibility: {:?}",
        engine.read().layer_visibility("XKT003-line")
    );

    viewer.dispatch(&UiEvent::input_changed("xkt001", false));
    viewer.dispatch(&UiEvent::click(
        ScreenPoint::new(10.0, 10.0),
        latlon!(35.9, 139.4),
    ));

    Ok(())
}
