//! Keeps the mounted metric widgets of every render target up to date.
//!
//! A render target is a node card or a guest detail view. Each target holds
//! named widgets (`cpu`, `memory`, ...). Updates arrive as batches of
//! [`MetricUpdate`]s guarded by an [`UpdateSequencer`] ticket, so an older
//! response that lands after a newer one is dropped instead of rendered.

mod sequencer;

pub use sequencer::{Sequence, UpdateSequencer};

use crate::core::domain::model::{node::Node, resource::ResourceMetrics};
use crate::core::domain::value_object::{NodeId, Vmid};
use crate::widget::sparkline::SPARKLINE_WIDGET;
use crate::widget::{
    Element, GaugeOptions, MetricCardData, MetricCardOptions, ProgressBarOptions,
    SparklineOptions, create_gauge, create_metric_card, create_progress_bar, create_sparkline,
    update_gauge, update_metric_card, update_progress_bar, update_sparkline,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Target holding the node list overview.
pub const NODES_TARGET: &str = "nodes";

pub const METRIC_CPU: &str = "cpu";
pub const METRIC_MEMORY: &str = "memory";
pub const METRIC_DISK: &str = "disk";
pub const METRIC_CPU_HISTORY: &str = "cpu-history";
pub const METRIC_MEMORY_HISTORY: &str = "memory-history";

/// Render target of a node card.
pub fn node_target(node_id: &NodeId) -> String {
    format!("node:{}", node_id)
}

/// Render target of a guest detail view.
pub fn resource_target(node_id: &NodeId, vmid: Vmid) -> String {
    format!("resource:{}:{}", node_id, vmid)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    ProgressBar,
    Gauge,
    MetricCard,
    Sparkline,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetKey {
    pub target: String,
    pub metric: String,
}

impl WidgetKey {
    pub fn new(target: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            metric: metric.into(),
        }
    }
}

/// One metric change. Widgets that are not mounted yet are created.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricUpdate {
    Usage {
        metric: String,
        kind: WidgetKind,
        title: String,
        value: f64,
        max: f64,
    },
    Samples {
        metric: String,
        samples: Vec<f64>,
    },
}

impl MetricUpdate {
    pub fn gauge(metric: &str, title: &str, value: f64, max: f64) -> Self {
        Self::usage(metric, WidgetKind::Gauge, title, value, max)
    }

    pub fn card(metric: &str, title: &str, value: f64, max: f64) -> Self {
        Self::usage(metric, WidgetKind::MetricCard, title, value, max)
    }

    pub fn bar(metric: &str, value: f64, max: f64) -> Self {
        Self::usage(metric, WidgetKind::ProgressBar, metric, value, max)
    }

    pub fn samples(metric: &str, samples: Vec<f64>) -> Self {
        MetricUpdate::Samples {
            metric: metric.to_string(),
            samples,
        }
    }

    fn usage(metric: &str, kind: WidgetKind, title: &str, value: f64, max: f64) -> Self {
        MetricUpdate::Usage {
            metric: metric.to_string(),
            kind,
            title: title.to_string(),
            value,
            max,
        }
    }

    pub fn metric(&self) -> &str {
        match self {
            MetricUpdate::Usage { metric, .. } | MetricUpdate::Samples { metric, .. } => metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { created: usize, updated: usize },
    /// A newer update for the target was rendered already.
    Stale,
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone)]
struct MountedWidget {
    kind: WidgetKind,
    element: Element,
}

#[derive(Debug, Default)]
pub struct Visualizer {
    widgets: Mutex<HashMap<WidgetKey, MountedWidget>>,
    sequencer: UpdateSequencer,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a ticket for the next update of `target`.
    pub fn begin(&self, target: &str) -> Sequence {
        let sequence = self.sequencer.issue();
        debug!(render_target = target, sequence = sequence.get(), "Issued update ticket");
        sequence
    }

    /// Applies `updates` to `target` unless a newer update was applied already.
    pub fn apply(&self, target: &str, sequence: Sequence, updates: &[MetricUpdate]) -> UpdateOutcome {
        // The widget lock is held across the check so a newer update cannot
        // render in between.
        let mut widgets = self.lock();
        if !self.sequencer.accept(target, sequence) {
            debug!(render_target = target, sequence = sequence.get(), "Discarding stale update");
            return UpdateOutcome::Stale;
        }
        let (created, updated) = apply_updates(&mut widgets, target, updates);
        UpdateOutcome::Applied { created, updated }
    }

    /// Renders a loaded node list: every node card gets its CPU gauge plus
    /// memory and disk cards.
    ///
    /// The batch is sequenced on [`NODES_TARGET`] and each card again on its own
    /// target, so a node rendered by a newer single-node update keeps that data.
    pub fn apply_nodes(&self, sequence: Sequence, nodes: &[Node]) -> UpdateOutcome {
        let mut widgets = self.lock();
        if !self.sequencer.accept(NODES_TARGET, sequence) {
            debug!(sequence = sequence.get(), "Discarding stale node list");
            return UpdateOutcome::Stale;
        }
        let (mut created, mut updated) = (0, 0);
        for node in nodes {
            let target = node_target(&node.id);
            if !self.sequencer.accept(&target, sequence) {
                debug!(render_target = %target, sequence = sequence.get(), "Keeping newer node card");
                continue;
            }
            let (c, u) = apply_updates(&mut widgets, &target, &node_updates(node));
            created += c;
            updated += u;
        }
        UpdateOutcome::Applied { created, updated }
    }

    /// Renders one node outside a list refresh, sequenced on its own target.
    pub fn apply_node(&self, node: &Node) -> UpdateOutcome {
        let target = node_target(&node.id);
        let sequence = self.begin(&target);
        self.apply(&target, sequence, &node_updates(node))
    }

    /// Drops every widget of `target`, returning how many were mounted.
    pub fn unmount(&self, target: &str) -> usize {
        let mut widgets = self.lock();
        self.sequencer.forget(target);
        let before = widgets.len();
        widgets.retain(|key, _| key.target != target);
        before - widgets.len()
    }

    pub fn element(&self, key: &WidgetKey) -> Option<Element> {
        self.lock().get(key).map(|w| w.element.clone())
    }

    pub fn kind(&self, key: &WidgetKey) -> Option<WidgetKind> {
        self.lock().get(key).map(|w| w.kind)
    }

    pub fn render_html(&self, key: &WidgetKey) -> Option<String> {
        self.lock().get(key).map(|w| w.element.to_html())
    }

    pub fn widget_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WidgetKey, MountedWidget>> {
        self.widgets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Widget updates describing a node card.
pub fn node_updates(node: &Node) -> Vec<MetricUpdate> {
    vec![
        MetricUpdate::gauge(METRIC_CPU, "CPU", node.cpu_usage().get(), 100.0),
        MetricUpdate::card(METRIC_MEMORY, "Memory", node.mem as f64, node.maxmem as f64),
        MetricUpdate::card(METRIC_DISK, "Disk", node.disk as f64, node.maxdisk as f64),
    ]
}

/// Widget updates describing a guest detail view.
pub fn resource_updates(metrics: &ResourceMetrics) -> Vec<MetricUpdate> {
    vec![
        MetricUpdate::gauge(METRIC_CPU, "CPU", metrics.cpu_usage().get(), 100.0),
        MetricUpdate::card(METRIC_MEMORY, "Memory", metrics.mem as f64, metrics.maxmem as f64),
        MetricUpdate::card(METRIC_DISK, "Disk", metrics.disk as f64, metrics.maxdisk as f64),
        MetricUpdate::samples(METRIC_CPU_HISTORY, metrics.cpu_series()),
        MetricUpdate::samples(METRIC_MEMORY_HISTORY, metrics.memory_series()),
    ]
}

fn apply_updates(
    widgets: &mut HashMap<WidgetKey, MountedWidget>,
    target: &str,
    updates: &[MetricUpdate],
) -> (usize, usize) {
    let (mut created, mut updated) = (0, 0);
    for update in updates {
        let key = WidgetKey::new(target, update.metric());
        let kind = match update {
            MetricUpdate::Usage { kind, .. } => *kind,
            MetricUpdate::Samples { .. } => WidgetKind::Sparkline,
        };

        let updated_in_place = match widgets.get_mut(&key) {
            Some(mounted) if mounted.kind == kind => update_widget(&mut mounted.element, update),
            _ => false,
        };
        if updated_in_place {
            updated += 1;
        } else {
            widgets.insert(
                key,
                MountedWidget {
                    kind,
                    element: create_widget(update),
                },
            );
            created += 1;
        }
    }
    (created, updated)
}

fn create_widget(update: &MetricUpdate) -> Element {
    match update {
        MetricUpdate::Usage {
            kind,
            title,
            value,
            max,
            ..
        } => match kind {
            WidgetKind::Gauge => create_gauge(
                *value,
                *max,
                &GaugeOptions::default().with_label(title.clone()),
            ),
            WidgetKind::MetricCard => create_metric_card(
                &MetricCardData::new(title.clone(), *value, *max),
                &MetricCardOptions::default(),
            ),
            WidgetKind::ProgressBar | WidgetKind::Sparkline => {
                create_progress_bar(*value, *max, &ProgressBarOptions::default())
            }
        },
        MetricUpdate::Samples { samples, .. } => {
            create_sparkline(samples, &SparklineOptions::default())
        }
    }
}

/// Returns `true` when the widget was found and updated in place.
fn update_widget(element: &mut Element, update: &MetricUpdate) -> bool {
    match update {
        MetricUpdate::Usage {
            kind, value, max, ..
        } => match kind {
            WidgetKind::Gauge => update_gauge(element, *value, *max),
            WidgetKind::MetricCard => update_metric_card(element, *value, *max),
            WidgetKind::ProgressBar | WidgetKind::Sparkline => {
                update_progress_bar(element, *value, *max)
            }
        },
        // A sparkline redraws itself whatever it currently shows, so any
        // mounted sparkline counts as updated in place.
        MetricUpdate::Samples { samples, .. } => {
            if element.widget_name() != Some(SPARKLINE_WIDGET) {
                return false;
            }
            update_sparkline(element, samples);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::model::node::NodeStatus;
    use crate::core::domain::model::resource::MetricSample;
    use crate::widget::gauge::ROLE_VALUE_TEXT;
    use crate::widget::metric_card::ROLE_VALUE;
    use crate::widget::sparkline::{EMPTY_CLASS, ROLE_LINE};

    fn node(id: &str, cpu: f64, mem: u64) -> Node {
        Node {
            id: NodeId::new(id).unwrap(),
            name: id.to_string(),
            status: NodeStatus::Online,
            host: None,
            port: None,
            cpu,
            maxcpu: Some(4),
            mem,
            maxmem: 1000,
            disk: 10,
            maxdisk: 100,
            uptime: None,
        }
    }

    fn text(visualizer: &Visualizer, key: &WidgetKey, role: &str) -> Option<String> {
        visualizer
            .element(key)
            .and_then(|e| e.find_role(role).and_then(|r| r.text_content().map(str::to_string)))
    }

    #[test]
    fn test_apply_creates_then_updates() {
        let visualizer = Visualizer::new();
        let target = "resource:pve1:100";

        let seq = visualizer.begin(target);
        let outcome = visualizer.apply(target, seq, &[MetricUpdate::gauge(METRIC_CPU, "CPU", 10.0, 100.0)]);
        assert_eq!(outcome, UpdateOutcome::Applied { created: 1, updated: 0 });

        let seq = visualizer.begin(target);
        let outcome = visualizer.apply(target, seq, &[MetricUpdate::gauge(METRIC_CPU, "CPU", 80.0, 100.0)]);
        assert_eq!(outcome, UpdateOutcome::Applied { created: 0, updated: 1 });

        let key = WidgetKey::new(target, METRIC_CPU);
        assert_eq!(visualizer.kind(&key), Some(WidgetKind::Gauge));
        assert_eq!(text(&visualizer, &key, ROLE_VALUE_TEXT).as_deref(), Some("80%"));
    }

    #[test]
    fn test_out_of_order_response_is_discarded() {
        let visualizer = Visualizer::new();
        let target = "resource:pve1:100";
        let key = WidgetKey::new(target, METRIC_CPU);

        let slow = visualizer.begin(target);
        let fast = visualizer.begin(target);
        assert!(visualizer
            .apply(target, fast, &[MetricUpdate::gauge(METRIC_CPU, "CPU", 90.0, 100.0)])
            .is_applied());
        assert_eq!(
            visualizer.apply(target, slow, &[MetricUpdate::gauge(METRIC_CPU, "CPU", 5.0, 100.0)]),
            UpdateOutcome::Stale
        );
        assert_eq!(text(&visualizer, &key, ROLE_VALUE_TEXT).as_deref(), Some("90%"));
    }

    #[test]
    fn test_apply_nodes_renders_each_node() {
        let visualizer = Visualizer::new();
        let nodes = vec![node("pve1", 0.25, 500), node("pve2", 0.95, 990)];
        let seq = visualizer.begin(NODES_TARGET);
        assert_eq!(
            visualizer.apply_nodes(seq, &nodes),
            UpdateOutcome::Applied { created: 6, updated: 0 }
        );
        assert_eq!(visualizer.widget_count(), 6);

        let memory = WidgetKey::new(node_target(&nodes[1].id), METRIC_MEMORY);
        assert_eq!(text(&visualizer, &memory, ROLE_VALUE).as_deref(), Some("99.0%"));
        let cpu = WidgetKey::new(node_target(&nodes[0].id), METRIC_CPU);
        assert_eq!(text(&visualizer, &cpu, ROLE_VALUE_TEXT).as_deref(), Some("25%"));
    }

    #[test]
    fn test_stale_node_list_is_discarded() {
        let visualizer = Visualizer::new();
        let old = visualizer.begin(NODES_TARGET);
        let new = visualizer.begin(NODES_TARGET);
        assert!(visualizer.apply_nodes(new, &[node("pve1", 0.5, 100)]).is_applied());
        assert_eq!(
            visualizer.apply_nodes(old, &[node("pve1", 0.1, 100)]),
            UpdateOutcome::Stale
        );
        let cpu = WidgetKey::new("node:pve1", METRIC_CPU);
        assert_eq!(text(&visualizer, &cpu, ROLE_VALUE_TEXT).as_deref(), Some("50%"));
    }

    #[test]
    fn test_slow_node_list_keeps_newer_single_node_update() {
        let visualizer = Visualizer::new();
        let cpu = WidgetKey::new("node:pve1", METRIC_CPU);

        let slow = visualizer.begin(NODES_TARGET);
        assert!(visualizer.apply_node(&node("pve1", 0.9, 100)).is_applied());

        let outcome = visualizer.apply_nodes(slow, &[node("pve1", 0.1, 100), node("pve2", 0.2, 100)]);
        assert_eq!(outcome, UpdateOutcome::Applied { created: 3, updated: 0 });
        assert_eq!(text(&visualizer, &cpu, ROLE_VALUE_TEXT).as_deref(), Some("90%"));
        assert!(visualizer.element(&WidgetKey::new("node:pve2", METRIC_CPU)).is_some());

        let next = visualizer.begin(NODES_TARGET);
        assert!(visualizer.apply_nodes(next, &[node("pve1", 0.3, 100)]).is_applied());
        assert_eq!(text(&visualizer, &cpu, ROLE_VALUE_TEXT).as_deref(), Some("30%"));
    }

    #[test]
    fn test_response_begun_before_unmount_is_discarded() {
        let visualizer = Visualizer::new();
        let target = "resource:pve1:100";
        let gauge = |pct: f64| [MetricUpdate::gauge(METRIC_CPU, "CPU", pct, 100.0)];

        let in_flight: Vec<_> = (0..5).map(|_| visualizer.begin(target)).collect();
        visualizer.unmount(target);
        assert_eq!(visualizer.apply(target, in_flight[0], &gauge(5.0)), UpdateOutcome::Stale);
        assert_eq!(visualizer.widget_count(), 0);

        let fresh1 = visualizer.begin(target);
        let fresh2 = visualizer.begin(target);
        assert!(visualizer.apply(target, fresh1, &gauge(40.0)).is_applied());
        assert_eq!(visualizer.apply(target, in_flight[4], &gauge(5.0)), UpdateOutcome::Stale);
        assert!(visualizer.apply(target, fresh2, &gauge(60.0)).is_applied());

        let key = WidgetKey::new(target, METRIC_CPU);
        assert_eq!(text(&visualizer, &key, ROLE_VALUE_TEXT).as_deref(), Some("60%"));
    }

    #[test]
    fn test_unchanged_samples_update_mounted_sparkline() {
        let visualizer = Visualizer::new();
        let target = "resource:pve1:100";
        let samples = [MetricUpdate::samples(METRIC_CPU_HISTORY, vec![1.0, 2.0])];

        let seq = visualizer.begin(target);
        assert_eq!(
            visualizer.apply(target, seq, &samples),
            UpdateOutcome::Applied { created: 1, updated: 0 }
        );
        let seq = visualizer.begin(target);
        assert_eq!(
            visualizer.apply(target, seq, &samples),
            UpdateOutcome::Applied { created: 0, updated: 1 }
        );
    }

    #[test]
    fn test_resource_updates_include_sparklines() {
        let visualizer = Visualizer::new();
        let node_id = NodeId::new("pve1").unwrap();
        let vmid = Vmid::new(101).unwrap();
        let target = resource_target(&node_id, vmid);
        let metrics = ResourceMetrics {
            cpu: 0.5,
            mem: 1,
            maxmem: 2,
            history: vec![
                MetricSample { time: 1, cpu: Some(0.1), mem: None, netin: None, netout: None },
                MetricSample { time: 2, cpu: Some(0.2), mem: None, netin: None, netout: None },
            ],
            ..Default::default()
        };

        let seq = visualizer.begin(&target);
        assert!(visualizer.apply(&target, seq, &resource_updates(&metrics)).is_applied());

        let cpu_history = visualizer
            .element(&WidgetKey::new(target.as_str(), METRIC_CPU_HISTORY))
            .unwrap();
        assert!(cpu_history.find_role(ROLE_LINE).is_some());
        let memory_history = visualizer
            .element(&WidgetKey::new(target.as_str(), METRIC_MEMORY_HISTORY))
            .unwrap();
        assert!(memory_history.has_class(EMPTY_CLASS));
    }

    #[test]
    fn test_kind_change_replaces_widget() {
        let visualizer = Visualizer::new();
        let seq = visualizer.begin("t");
        visualizer.apply("t", seq, &[MetricUpdate::bar("load", 1.0, 2.0)]);
        let seq = visualizer.begin("t");
        let outcome = visualizer.apply("t", seq, &[MetricUpdate::gauge("load", "Load", 1.0, 2.0)]);
        assert_eq!(outcome, UpdateOutcome::Applied { created: 1, updated: 0 });
        assert_eq!(visualizer.kind(&WidgetKey::new("t", "load")), Some(WidgetKind::Gauge));
    }

    #[test]
    fn test_unmount_target() {
        let visualizer = Visualizer::new();
        visualizer.apply_node(&node("pve1", 0.1, 1));
        visualizer.apply_node(&node("pve2", 0.1, 1));
        assert_eq!(visualizer.unmount("node:pve1"), 3);
        assert_eq!(visualizer.widget_count(), 3);
        assert!(visualizer.render_html(&WidgetKey::new("node:pve1", METRIC_CPU)).is_none());
        assert!(visualizer.render_html(&WidgetKey::new("node:pve2", METRIC_CPU)).is_some());
    }
}
