use crate::camera::CameraState;
use crate::config::ViewerConfig;
use crate::control::{EventProcessor, Subscription, UiEvent};
use crate::controls::ControlSet;
use crate::engine::{MapEngine, PopupDisplay, SharedDisplay, SharedEngine};
use crate::error::ViewerError;
#[cfg(not(target_arch = "wasm32"))]
use crate::geocoder::GsiGeocoder;
use crate::layer_switch::LayerSwitchController;
use crate::popup::FeaturePopupBuilder;

/// A configured map viewer.
///
/// The viewer is the context its components share: it owns the event processor and hands
/// the engine and popup display to the layer switches and the popup builder. Nothing is
/// wired until [`Viewer::on_load`] is called, which the host does once the map style has
/// loaded.
pub struct Viewer<E, D> {
    config: ViewerConfig,
    engine: SharedEngine<E>,
    display: SharedDisplay<D>,
    events: EventProcessor,
    controls: ControlSet,
    switches: LayerSwitchController<E>,
    popups: FeaturePopupBuilder<E, D>,
    camera: CameraState,
    subscriptions: Vec<Subscription>,
    loaded: bool,
}

impl<E, D> Viewer<E, D>
where
    E: MapEngine + Send + Sync + 'static,
    D: PopupDisplay + Send + 'static,
{
    /// Creates a viewer. Fails if the configuration is invalid.
    pub fn new(
        config: ViewerConfig,
        engine: SharedEngine<E>,
        display: SharedDisplay<D>,
    ) -> Result<Self, ViewerError> {
        config.validate()?;
        let controls = ControlSet::try_from(config.controls.clone())?;

        let switches = LayerSwitchController::new(engine.clone());
        let popups = FeaturePopupBuilder::new(engine.clone(), display.clone())
            .with_options(config.popup.clone())
            .with_labels(config.table_labels.clone());
        let camera = config.camera.initial_state();

        Ok(Self {
            config,
            engine,
            display,
            events: EventProcessor::default(),
            controls,
            switches,
            popups,
            camera,
            subscriptions: vec![],
            loaded: false,
        })
    }

    /// Restores the camera from a URL hash if the viewer keeps its camera in the hash.
    pub fn restore_hash(&mut self, hash: &str) -> Result<(), ViewerError> {
        if self.config.hash {
            self.set_camera(CameraState::from_hash(hash)?);
        }

        Ok(())
    }

    /// Wires layer switches and feature popups. Returns `false` if they are already wired.
    pub fn on_load(&mut self) -> Result<bool, ViewerError> {
        if self.loaded {
            return Ok(false);
        }

        let toggles = self.config.layer_toggles()?;
        let toggle_count = toggles.len();
        self.subscriptions
            .extend(self.switches.register_toggles(toggles, &self.events));
        self.subscriptions.extend(self.popups.register_layers(
            self.config.popup_layers.iter().map(String::as_str),
            &self.events,
        ));

        log::info!(
            "Viewer for style '{}' wired {toggle_count} layer switches and {} popup layers",
            self.config.style,
            self.config.popup_layers.len()
        );

        self.loaded = true;
        Ok(true)
    }

    /// Removes every handler registered by [`Viewer::on_load`].
    pub fn unload(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        self.loaded = false;
    }

    /// Returns `true` between [`Viewer::on_load`] and [`Viewer::unload`].
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Gives a UI event to the viewer's handlers.
    pub fn dispatch(&self, event: &UiEvent) {
        self.events.handle(event);
    }

    /// Event processor the viewer's handlers are registered with.
    pub fn events(&self) -> &EventProcessor {
        &self.events
    }

    /// Current camera.
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Moves the camera, limited by the configured zoom and pitch ranges.
    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera.clamp(&self.config.camera);
    }

    /// URL hash of the current camera, if the viewer keeps its camera in the hash.
    pub fn hash(&self) -> Option<String> {
        self.config.hash.then(|| self.camera.to_hash())
    }

    /// Controls placed over the map.
    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    /// Whether the host should draw tile outlines over the map.
    pub fn show_tile_boundaries(&self) -> bool {
        self.config.show_tile_boundaries
    }

    /// Address search service for the search box. `None` if the configuration has no
    /// geocoder.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn geocoder(&self) -> Result<Option<GsiGeocoder>, ViewerError> {
        self.config
            .geocoder
            .as_ref()
            .map(GsiGeocoder::new)
            .transpose()
    }

    /// Configuration the viewer was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Map engine shared with the layer switches and the popup builder.
    pub fn engine(&self) -> &SharedEngine<E> {
        &self.engine
    }

    /// Popup display shared with the popup builder.
    pub fn display(&self) -> &SharedDisplay<D> {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToggleConfig;
    use crate::controls::ControlKind;
    use crate::engine::{LayerCollection, Visibility};
    use crate::feature::RenderedFeature;
    use crate::geocoder::GSI_ADDRESS_SEARCH_URL;
    use crate::popup::Popup;
    use crate::style::StyleDocument;
    use parking_lot::{Mutex, RwLock};
    use reinfo_map_types::{latlon, Properties, ScreenPoint, ScreenRect};
    use std::sync::Arc;

    const STYLE: &str = r#"{
        "version": 8,
        "layers": [
            {"id": "XPT001", "type": "circle"},
            {"id": "XKT003", "type": "fill"},
            {"id": "XKT003-line", "type": "line"}
        ]
    }"#;

    fn config() -> ViewerConfig {
        let mut config = ViewerConfig::reinfolib();
        config.popup_layers = vec!["XPT001".to_string(), "XKT003".to_string()];
        config.toggles = vec![
            ToggleConfig {
                element_id: "xkt003".to_string(),
                layers: "XKT003, XKT003-line".to_string(),
                checked: true,
            },
            ToggleConfig {
                element_id: "xkt004".to_string(),
                layers: "XKT004,XKT004-line".to_string(),
                checked: true,
            },
        ];

        config
    }

    type TestViewer = Viewer<LayerCollection, Vec<Popup>>;

    fn viewer() -> TestViewer {
        let style = StyleDocument::from_json_str(STYLE).expect("valid style");
        let mut collection = LayerCollection::from_style(&style);
        let properties: Properties = [("name", "station")].into_iter().collect();
        collection
            .insert_feature(
                RenderedFeature::point("XPT001", properties, latlon!(35.9, 139.47)),
                Some(ScreenRect::around(ScreenPoint::new(100.0, 100.0), 5.0)),
            )
            .expect("layer exists");
        let zone: Properties = [("zone", "residential")].into_iter().collect();
        collection
            .insert_feature(
                RenderedFeature::new("XKT003", zone, crate::feature::FeatureGeometry::Other),
                None,
            )
            .expect("layer exists");

        Viewer::new(
            config(),
            Arc::new(RwLock::new(collection)),
            Arc::new(Mutex::new(vec![])),
        )
        .expect("valid config")
    }

    #[test]
    fn nothing_is_wired_before_load() {
        let viewer = viewer();
        viewer.dispatch(&UiEvent::click(
            ScreenPoint::new(100.0, 100.0),
            latlon!(35.9, 139.47),
        ));

        assert!(viewer.display().lock().is_empty());
        assert_eq!(viewer.events().handler_count(), 0);
    }

    #[test]
    fn on_load_wires_once() {
        let mut viewer = viewer();
        assert!(viewer.on_load().expect("loads"));
        assert!(!viewer.on_load().expect("loads"));
        assert_eq!(viewer.events().handler_count(), 4);
    }

    #[test]
    fn clicks_show_popups_per_layer() {
        let mut viewer = viewer();
        viewer.on_load().expect("loads");

        let click = latlon!(35.9001, 139.4702);
        viewer.dispatch(&UiEvent::click(ScreenPoint::new(101.0, 99.0), click));

        let popups = viewer.display().lock();
        assert_eq!(popups.len(), 2);
        assert_eq!(popups[0].report.sections[0].title, "XPT001 #1");
        assert_eq!(popups[1].report.sections[0].title, "XKT003 #1");
        assert!(popups.iter().all(|popup| popup.report.anchor == click));
    }

    #[test]
    fn switches_change_visibility_and_tolerate_missing_layers() {
        let mut viewer = viewer();
        viewer.on_load().expect("loads");

        viewer.dispatch(&UiEvent::input_changed("xkt003", false));
        viewer.dispatch(&UiEvent::input_changed("xkt004", false));
        {
            let engine = viewer.engine().read();
            assert_eq!(engine.layer_visibility("XKT003"), Some(Visibility::None));
            assert_eq!(engine.layer_visibility("XKT003-line"), Some(Visibility::None));
        }

        // Hidden layers are not hit anymore, the session keeps working.
        viewer.dispatch(&UiEvent::click(
            ScreenPoint::new(10.0, 10.0),
            latlon!(35.9, 139.47),
        ));
        assert!(viewer.display().lock().is_empty());
    }

    #[test]
    fn unload_removes_handlers() {
        let mut viewer = viewer();
        viewer.on_load().expect("loads");
        viewer.unload();

        assert!(!viewer.is_loaded());
        assert_eq!(viewer.events().handler_count(), 0);
        viewer.dispatch(&UiEvent::input_changed("xkt003", false));
        assert_eq!(
            viewer.engine().read().layer_visibility("XKT003"),
            Some(Visibility::Visible)
        );
    }

    #[test]
    fn camera_follows_hash_within_limits() {
        let mut viewer = viewer();
        assert_eq!(viewer.hash().as_deref(), Some("#12/35.90596/139.47507"));

        viewer.restore_hash("#5/35.5/139.5").expect("valid hash");
        assert_eq!(viewer.camera().zoom, 11.0);
        assert_eq!(viewer.hash().as_deref(), Some("#11/35.5/139.5"));

        assert!(viewer.restore_hash("#bad").is_err());
        assert!(viewer.restore_hash("#12/35.9/139.4/nan/0").is_err());
        assert_eq!(viewer.hash().as_deref(), Some("#11/35.5/139.5"));
        assert!(viewer.controls().contains(ControlKind::Geocoder));
        assert_eq!(viewer.controls().len(), 6);
    }

    #[test]
    fn geocoder_and_tile_boundaries_follow_config() {
        let viewer = viewer();
        assert!(!viewer.show_tile_boundaries());
        let geocoder = viewer
            .geocoder()
            .expect("client builds")
            .expect("preset has a geocoder");
        assert_eq!(geocoder.base_url(), GSI_ADDRESS_SEARCH_URL);

        let mut config = config();
        config.geocoder = None;
        config.show_tile_boundaries = true;
        let viewer: TestViewer = Viewer::new(
            config,
            Arc::new(RwLock::new(LayerCollection::default())),
            Arc::new(Mutex::new(vec![])),
        )
        .expect("valid config");
        assert!(viewer.show_tile_boundaries());
        assert!(viewer.geocoder().expect("nothing to build").is_none());
    }
}
