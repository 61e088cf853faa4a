//! App-bar button registration
//!
//! New buttons are not built from scratch. The registrar clones a stock
//! button from the host's app tray, renames it, swaps its label and icon,
//! routes its toggle to the mod, and shares the stock button's "close tray"
//! action so pressing it collapses the same tray.
//!
//! Registration only works once the HUD has settled, so mods normally go
//! through [`ModContext::register_app_button`](crate::ModContext::register_app_button),
//! which waits for the ready notifier.
//!
//! # Example
//!
//! ```ignore
//! use warpkit_core::{ButtonDescriptor, Icon, ToolbarBackend};
//!
//! let backend = ToolbarBackend::new(config.toolbar.clone());
//! let handle = backend.add_button(
//!     &mut scene,
//!     ButtonDescriptor::new("My Mod", "BTN-MyMod", Icon::default(), |on| {
//!         tracing::info!("toggled: {}", on);
//!     }),
//! );
//! ```

mod error;

use serde::{Deserialize, Serialize};
use warpkit_sdk::{surfaces, ActionId, ComponentKind, NodeId};

use crate::assets::Icon;
use crate::scene::{SceneGraph, ToggleProperty};

pub use error::RegistrationError;

/// Scene-graph locations used to find and customise the template button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarPaths {
    /// Full path of the app-tray group that receives new buttons
    pub container: String,
    /// Name of the stock button cloned as a template
    pub template: String,
    /// Child of a button holding label and icon
    pub content: String,
    /// Label child under `content`
    pub title: String,
    /// Icon group under `content`
    pub icon_group: String,
    /// Icon image under `icon_group`
    pub icon: String,
}

impl Default for ToolbarPaths {
    fn default() -> Self {
        Self {
            container: surfaces::APP_BAR_OTHERS_GROUP.to_string(),
            template: surfaces::RESOURCE_MANAGER_BUTTON.to_string(),
            content: surfaces::BUTTON_CONTENT.to_string(),
            title: surfaces::BUTTON_TITLE.to_string(),
            icon_group: surfaces::BUTTON_ICON_GROUP.to_string(),
            icon: surfaces::BUTTON_ICON.to_string(),
        }
    }
}

/// Callback receiving the button's new toggle state
pub type ToggleCallback = Box<dyn FnMut(bool) + Send + 'static>;

/// What a mod wants its button to look like
pub struct ButtonDescriptor {
    pub label: String,
    /// Node name given to the button; should be unique in the app tray
    pub id: String,
    pub icon: Icon,
    pub on_toggle: ToggleCallback,
}

impl ButtonDescriptor {
    pub fn new<F>(label: impl Into<String>, id: impl Into<String>, icon: Icon, on_toggle: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        Self {
            label: label.into(),
            id: id.into(),
            icon,
            on_toggle: Box::new(on_toggle),
        }
    }
}

impl std::fmt::Debug for ButtonDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonDescriptor")
            .field("label", &self.label)
            .field("id", &self.id)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// A button that was added to the app bar
#[derive(Debug, Clone)]
pub struct ButtonHandle {
    pub node: NodeId,
    pub id: String,
    /// State shown by the button; set it to keep the button in sync when the
    /// mod's window is opened or closed by other means
    pub value: ToggleProperty,
}

/// Nodes resolved on the template before anything is cloned
struct TemplateParts {
    container: NodeId,
    template: NodeId,
    action: ActionId,
}

/// Adds app-bar buttons by cloning a template button
#[derive(Debug, Clone, Default)]
pub struct ToolbarBackend {
    paths: ToolbarPaths,
}

impl ToolbarBackend {
    pub fn new(paths: ToolbarPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ToolbarPaths {
        &self.paths
    }

    /// Add a button, logging the outcome
    ///
    /// # Returns
    /// The new button, or `None` if any node or component was missing. A
    /// failed attempt leaves the scene unchanged and is not retried.
    pub fn add_button<S>(&self, scene: &mut S, descriptor: ButtonDescriptor) -> Option<ButtonHandle>
    where
        S: SceneGraph + ?Sized,
    {
        let id = descriptor.id.clone();
        match self.try_add_button(scene, descriptor) {
            Ok(handle) => {
                tracing::info!("Added appbar button: {}", id);
                Some(handle)
            }
            Err(e) => {
                tracing::info!("Couldn't add appbar button {}: {}", id, e);
                None
            }
        }
    }

    /// Add a button, returning the reason on failure
    pub fn try_add_button<S>(
        &self,
        scene: &mut S,
        descriptor: ButtonDescriptor,
    ) -> Result<ButtonHandle, RegistrationError>
    where
        S: SceneGraph + ?Sized,
    {
        let parts = self.resolve_template(scene)?;

        let button = scene
            .instantiate(parts.template, parts.container)
            .ok_or(RegistrationError::CloneFailed)?;

        match self.customize(scene, button, parts.action, descriptor) {
            Ok(handle) => Ok(handle),
            Err(e) => {
                scene.destroy(button);
                Err(e)
            }
        }
    }

    /// Check everything the clone will need while only reading the scene
    fn resolve_template<S>(&self, scene: &S) -> Result<TemplateParts, RegistrationError>
    where
        S: SceneGraph + ?Sized,
    {
        let p = &self.paths;

        let container = scene
            .find(&p.container)
            .ok_or_else(|| RegistrationError::ContainerMissing(p.container.clone()))?;
        let template = scene
            .child(container, &p.template)
            .ok_or_else(|| RegistrationError::TemplateMissing(p.template.clone()))?;

        let title = self.title_node(scene, template)?;
        require(scene, title, &p.title, ComponentKind::Text)?;
        let icon = self.icon_node(scene, template)?;
        require(scene, icon, &p.icon, ComponentKind::Image)?;

        for kind in [
            ComponentKind::Toggle,
            ComponentKind::ToggleValue,
            ComponentKind::ToggleAction,
        ] {
            require(scene, template, &p.template, kind)?;
        }
        let action = scene
            .toggle_action(template)
            .ok_or(RegistrationError::ActionMissing)?;

        Ok(TemplateParts {
            container,
            template,
            action,
        })
    }

    fn title_node<S>(&self, scene: &S, button: NodeId) -> Result<NodeId, RegistrationError>
    where
        S: SceneGraph + ?Sized,
    {
        let p = &self.paths;
        scene
            .descendant(button, &[p.content.as_str(), p.title.as_str()])
            .ok_or_else(|| RegistrationError::ChildMissing(format!("{}/{}", p.content, p.title)))
    }

    fn icon_node<S>(&self, scene: &S, button: NodeId) -> Result<NodeId, RegistrationError>
    where
        S: SceneGraph + ?Sized,
    {
        let p = &self.paths;
        scene
            .descendant(button, &[p.content.as_str(), p.icon_group.as_str(), p.icon.as_str()])
            .ok_or_else(|| {
                RegistrationError::ChildMissing(format!("{}/{}/{}", p.content, p.icon_group, p.icon))
            })
    }

    fn customize<S>(
        &self,
        scene: &mut S,
        button: NodeId,
        action: ActionId,
        descriptor: ButtonDescriptor,
    ) -> Result<ButtonHandle, RegistrationError>
    where
        S: SceneGraph + ?Sized,
    {
        let ButtonDescriptor {
            label,
            id,
            icon,
            on_toggle,
        } = descriptor;

        check(scene.set_name(button, &id), "rename")?;

        let title = self.title_node(scene, button)?;
        check(scene.set_text(title, &label), "set the label")?;

        let icon_node = self.icon_node(scene, button)?;
        check(scene.set_icon(icon_node, &icon), "set the icon")?;

        check(
            scene.add_toggle_listener(button, on_toggle),
            "listen to the toggle",
        )?;

        let value = ToggleProperty::new(false);
        check(
            scene.bind_toggle_value(button, value.clone()),
            "bind the toggle value",
        )?;

        check(
            scene.bind_toggle_action(button, action),
            "bind the close-tray action",
        )?;

        Ok(ButtonHandle {
            node: button,
            id,
            value,
        })
    }
}

fn require<S>(scene: &S, node: NodeId, name: &str, kind: ComponentKind) -> Result<(), RegistrationError>
where
    S: SceneGraph + ?Sized,
{
    if scene.has_component(node, kind) {
        Ok(())
    } else {
        Err(RegistrationError::ComponentMissing {
            node: name.to_string(),
            kind,
        })
    }
}

fn check(ok: bool, what: &'static str) -> Result<(), RegistrationError> {
    if ok {
        Ok(())
    } else {
        Err(RegistrationError::UpdateFailed(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::scene::MemoryScene;

    const CLOSE_TRAY: ActionId = ActionId(42);

    /// Collects formatted log lines in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.lines())
    }

    fn descriptor(calls: &Arc<Mutex<Vec<bool>>>) -> ButtonDescriptor {
        let calls = calls.clone();
        ButtonDescriptor::new("Example Mod", "BTN-ExampleMod", Icon::blank(24), move |state| {
            calls.lock().push(state)
        })
    }

    fn container(scene: &MemoryScene, paths: &ToolbarPaths) -> NodeId {
        scene.find(&paths.container).unwrap()
    }

    #[test]
    fn test_add_button_clones_and_customizes() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let handle = backend.add_button(&mut scene, descriptor(&calls)).unwrap();
        let p = backend.paths();

        assert_eq!(scene.name(handle.node), Some("BTN-ExampleMod"));
        assert_eq!(scene.parent(handle.node), Some(container(&scene, p)));
        assert_eq!(
            scene.child(container(&scene, p), "BTN-ExampleMod"),
            Some(handle.node)
        );

        let title = scene.descendant(handle.node, &[p.content.as_str(), p.title.as_str()]).unwrap();
        assert_eq!(scene.text(title), Some("Example Mod"));
        let icon = scene
            .descendant(handle.node, &[p.content.as_str(), p.icon_group.as_str(), p.icon.as_str()])
            .unwrap();
        assert_eq!(scene.icon(icon), Some(&Icon::blank(24)));

        assert_eq!(scene.toggle_value(handle.node), Some(false));
        assert_eq!(scene.toggle_action(handle.node), Some(CLOSE_TRAY));
    }

    #[test]
    fn test_toggle_forwards_state() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let handle = backend.add_button(&mut scene, descriptor(&calls)).unwrap();

        scene.press_toggle(handle.node, true);
        scene.press_toggle(handle.node, false);

        assert_eq!(*calls.lock(), vec![true, false]);
        assert!(!handle.value.get());
    }

    #[test]
    fn test_template_is_untouched() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let p = backend.paths().clone();

        backend.add_button(&mut scene, descriptor(&calls)).unwrap();

        let template = scene.child(container(&scene, &p), &p.template).unwrap();
        let title = scene.descendant(template, &[p.content.as_str(), p.title.as_str()]).unwrap();
        assert_eq!(scene.text(title), Some("Resource Manager"));

        scene.press_toggle(template, true);
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_missing_container_logs_once_and_leaves_no_node() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::new();
        scene.build_path("GameManager/Default Game Instance(Clone)");
        let before = scene.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let (handle, lines) = capture_logs(|| backend.add_button(&mut scene, descriptor(&calls)));

        assert!(handle.is_none());
        assert_eq!(lines.len(), 1, "log lines: {lines:?}");
        assert!(lines[0].contains("Couldn't"));
        assert_eq!(scene.node_count(), before);
    }

    #[test]
    fn test_missing_template() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::new();
        scene.build_path(&backend.paths().container);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let err = backend
            .try_add_button(&mut scene, descriptor(&calls))
            .unwrap_err();

        assert!(matches!(err, RegistrationError::TemplateMissing(_)));
    }

    #[test]
    fn test_missing_child_leaves_no_node() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY);
        let p = backend.paths().clone();
        let template = scene.child(container(&scene, &p), &p.template).unwrap();
        let icon_group = scene.descendant(template, &[p.content.as_str(), p.icon_group.as_str()]).unwrap();
        scene.destroy(icon_group);
        let before = scene.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let err = backend
            .try_add_button(&mut scene, descriptor(&calls))
            .unwrap_err();

        assert!(matches!(err, RegistrationError::ChildMissing(_)));
        assert_eq!(scene.node_count(), before);
    }

    #[test]
    fn test_missing_component() {
        let backend = ToolbarBackend::default();
        let mut scene = MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY);
        let p = backend.paths().clone();
        let template = scene.child(container(&scene, &p), &p.template).unwrap();
        scene.remove_component(template, ComponentKind::ToggleValue);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let err = backend
            .try_add_button(&mut scene, descriptor(&calls))
            .unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::ComponentMissing {
                kind: ComponentKind::ToggleValue,
                ..
            }
        ));
    }

    #[test]
    fn test_custom_paths() {
        let paths = ToolbarPaths {
            container: "HUD/Tray".to_string(),
            template: "BTN-Stock".to_string(),
            ..ToolbarPaths::default()
        };
        let backend = ToolbarBackend::new(paths.clone());
        let mut scene = MemoryScene::stock_app_bar(&paths, CLOSE_TRAY);
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();

        let handle = backend
            .add_button(
                &mut scene,
                ButtonDescriptor::new("A", "BTN-A", Icon::default(), move |_| {
                    inner.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        scene.press_toggle(handle.node, true);

        assert_eq!(scene.find("HUD/Tray/BTN-A"), Some(handle.node));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_paths_deserialize_with_defaults() {
        let paths: ToolbarPaths = toml::from_str(r#"template = "BTN-Other""#).unwrap();

        assert_eq!(paths.template, "BTN-Other");
        assert_eq!(paths.container, surfaces::APP_BAR_OTHERS_GROUP);
    }

    /// Host step a [`RefusingScene`] rejects
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Refuse {
        Instantiate,
        ToggleAction,
        BindToggleAction,
    }

    /// MemoryScene that rejects one host step
    struct RefusingScene {
        inner: MemoryScene,
        refuse: Refuse,
    }

    impl SceneGraph for RefusingScene {
        fn find(&self, path: &str) -> Option<NodeId> {
            self.inner.find(path)
        }

        fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
            self.inner.child(node, name)
        }

        fn has_component(&self, node: NodeId, kind: ComponentKind) -> bool {
            self.inner.has_component(node, kind)
        }

        fn instantiate(&mut self, template: NodeId, parent: NodeId) -> Option<NodeId> {
            if self.refuse == Refuse::Instantiate {
                return None;
            }
            self.inner.instantiate(template, parent)
        }

        fn destroy(&mut self, node: NodeId) {
            self.inner.destroy(node)
        }

        fn set_name(&mut self, node: NodeId, name: &str) -> bool {
            self.inner.set_name(node, name)
        }

        fn set_text(&mut self, node: NodeId, text: &str) -> bool {
            self.inner.set_text(node, text)
        }

        fn set_icon(&mut self, node: NodeId, icon: &Icon) -> bool {
            self.inner.set_icon(node, icon)
        }

        fn add_toggle_listener(&mut self, node: NodeId, listener: crate::scene::ToggleListener) -> bool {
            self.inner.add_toggle_listener(node, listener)
        }

        fn bind_toggle_value(&mut self, node: NodeId, value: ToggleProperty) -> bool {
            self.inner.bind_toggle_value(node, value)
        }

        fn toggle_action(&self, node: NodeId) -> Option<ActionId> {
            if self.refuse == Refuse::ToggleAction {
                return None;
            }
            self.inner.toggle_action(node)
        }

        fn bind_toggle_action(&mut self, node: NodeId, action: ActionId) -> bool {
            self.refuse != Refuse::BindToggleAction && self.inner.bind_toggle_action(node, action)
        }
    }

    fn refusing(backend: &ToolbarBackend, refuse: Refuse) -> RefusingScene {
        RefusingScene {
            inner: MemoryScene::stock_app_bar(backend.paths(), CLOSE_TRAY),
            refuse,
        }
    }

    #[test]
    fn test_failed_update_destroys_clone() {
        let backend = ToolbarBackend::default();
        let mut scene = refusing(&backend, Refuse::BindToggleAction);
        let before = scene.inner.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let result = backend.try_add_button(&mut scene, descriptor(&calls));
        assert!(matches!(
            result,
            Err(RegistrationError::UpdateFailed("bind the close-tray action"))
        ));

        assert_eq!(scene.inner.node_count(), before);
        let p = backend.paths();
        let tray = container(&scene.inner, p);
        assert_eq!(scene.inner.child(tray, "BTN-ExampleMod"), None);
        assert_eq!(scene.inner.children(tray).len(), 1);
    }

    #[test]
    fn test_failed_update_logs_once() {
        let backend = ToolbarBackend::default();
        let mut scene = refusing(&backend, Refuse::BindToggleAction);
        let before = scene.inner.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let (handle, lines) = capture_logs(|| backend.add_button(&mut scene, descriptor(&calls)));

        assert!(handle.is_none());
        assert_eq!(lines.len(), 1, "log lines: {lines:?}");
        assert!(lines[0].contains("Couldn't add appbar button BTN-ExampleMod"));
        assert_eq!(scene.inner.node_count(), before);
    }

    #[test]
    fn test_clone_refused() {
        let backend = ToolbarBackend::default();
        let mut scene = refusing(&backend, Refuse::Instantiate);
        let before = scene.inner.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let (handle, lines) = capture_logs(|| backend.add_button(&mut scene, descriptor(&calls)));

        assert!(handle.is_none());
        assert_eq!(lines.len(), 1, "log lines: {lines:?}");
        assert!(lines[0].contains("Failed to clone template button"));
        assert_eq!(scene.inner.node_count(), before);
    }

    #[test]
    fn test_template_without_action() {
        let backend = ToolbarBackend::default();
        let mut scene = refusing(&backend, Refuse::ToggleAction);
        let before = scene.inner.node_count();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let (handle, lines) = capture_logs(|| backend.add_button(&mut scene, descriptor(&calls)));

        assert!(handle.is_none());
        assert_eq!(lines.len(), 1, "log lines: {lines:?}");
        assert!(lines[0].contains("Template button has no toggle action"));
        assert_eq!(scene.inner.node_count(), before);

        let err = backend
            .try_add_button(&mut scene, descriptor(&calls))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ActionMissing));
    }
}
