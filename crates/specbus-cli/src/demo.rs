//! Demo components mounted by the `demo`, `inspect` and `publish` commands.
//!
//! | Component | Code | Base subscriptions | Handler strategy |
//! |-----------|------|--------------------|------------------|
//! | Toolbar | TB1 | `system:start`, `system:stop` | closed [`EventSet`] |
//! | Grid | GR1 | `ui:windowSizeChange` | method name |

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use specbus_component::{decode_payload, ComponentError, EventSet, HandlerTable};
use specbus_event::{Event, PublicationEntry, PublicationSpec, SubscriptionSpec};
use specbus_runtime::{ComponentTemplate, LifecycleAdapter, MediatorHandle, ScopedComponent};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Events the toolbar understands.
#[derive(Debug)]
enum ToolbarEvent {
    SystemStart,
    SystemStop,
}

impl EventSet for ToolbarEvent {
    fn subscription_spec() -> SubscriptionSpec {
        SubscriptionSpec::new()
            .with_event("system", "start")
            .with_event("system", "stop")
    }

    fn decode(event: &Event) -> Result<Option<Self>, ComponentError> {
        Ok(match (event.channel.as_str(), event.event.as_str()) {
            ("system", "start") => Some(Self::SystemStart),
            ("system", "stop") => Some(Self::SystemStop),
            _ => None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WindowSize {
    width: u32,
    height: u32,
}

fn print_delivery(target: &str, code: &str, event: &Event, detail: &str) {
    println!(
        "  {target} ({code}) <- {}:{} from {} ({}){detail}",
        event.channel, event.event, event.component_name, event.component_code
    );
}

fn toolbar() -> Result<ComponentTemplate> {
    let template = ComponentTemplate::typed("Toolbar", "TB1", |evt: ToolbarEvent, raw| {
        let detail = match evt {
            ToolbarEvent::SystemStart => " [enable buttons]",
            ToolbarEvent::SystemStop => " [disable buttons]",
        };
        print_delivery("Toolbar", "TB1", raw, detail);
        Ok(())
    })?
    .with_description("Application toolbar")
    .with_publications(
        PublicationSpec::new().with_entry(
            PublicationEntry::new("toolbar", "buttonClick")
                .with_description("A toolbar button was pressed")
                .with_condition("user clicks an enabled button"),
        ),
    );
    Ok(template)
}

fn grid() -> ComponentTemplate {
    let handlers = HandlerTable::new().on_method("handleUiWindowSizeChange", |evt| {
        let size: WindowSize = decode_payload(evt)?;
        print_delivery(
            "Grid",
            "GR1",
            evt,
            &format!(" [relayout {}x{}]", size.width, size.height),
        );
        Ok(())
    });

    ComponentTemplate::new("Grid", "GR1")
        .with_description("Data grid")
        .with_subscriptions(SubscriptionSpec::new().with_event("ui", "windowSizeChange"))
        .with_handlers(handlers)
}

/// Per-component extension specs, read from a JSON file.
///
/// ```json
/// {
///   "component": "Grid",
///   "subscriptionSpec": { "subscriptions": [ { "channel": "system", "events": [ { "name": "stop" } ] } ] },
///   "publicationSpec": { "publications": [] }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub component: String,
    #[serde(default)]
    pub subscription_spec: SubscriptionSpec,
    #[serde(default)]
    pub publication_spec: PublicationSpec,
}

impl Extension {
    /// Reads an extension file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read extension file {}", path.display()))?;
        let ext: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid extension file {}", path.display()))?;
        debug!(path = %path.display(), component = %ext.component, "Loaded extension");
        Ok(ext)
    }
}

/// Loads every extension file, rejecting ones that name no demo component.
pub fn load_extensions(paths: &[PathBuf]) -> Result<Vec<Extension>> {
    let extensions = paths
        .iter()
        .map(|p| Extension::load(p))
        .collect::<Result<Vec<_>>>()?;

    for ext in &extensions {
        if !matches!(ext.component.as_str(), "Toolbar" | "Grid") {
            bail!(
                "extension targets unknown component '{}' (expected Toolbar or Grid)",
                ext.component
            );
        }
    }
    Ok(extensions)
}

/// Mounts Toolbar and Grid with their extensions merged in.
///
/// The returned scopes keep both components registered.
pub fn mount(handle: &MediatorHandle, extensions: &[Extension]) -> Result<Vec<ScopedComponent>> {
    let mut scopes = Vec::new();

    for template in [toolbar()?, grid()] {
        let mut subscriptions = SubscriptionSpec::new();
        let mut publications = PublicationSpec::new();
        for ext in extensions.iter().filter(|e| e.component == template.name()) {
            subscriptions =
                specbus_event::merge_subscription_specs(&subscriptions, &ext.subscription_spec)?;
            publications =
                specbus_event::merge_publication_specs(&publications, &ext.publication_spec)?;
        }

        let name = template.name().to_string();
        let adapter = LifecycleAdapter::new(handle.clone(), template);
        let scope = adapter
            .enter(&subscriptions, &publications)
            .with_context(|| format!("failed to mount {name}"))?;
        scopes.push(scope);
    }

    Ok(scopes)
}
