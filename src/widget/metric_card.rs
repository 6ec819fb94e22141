use super::element::{Element, WIDGET_ATTR};
use super::format::{format_percentage, format_value};
use super::level::UsageLevel;
use super::progress_bar::{
    PROGRESS_BAR_WIDGET, ProgressBarOptions, create_progress_bar, update_progress_bar,
};
use crate::core::domain::value_object::Percentage;

pub const METRIC_CARD_WIDGET: &str = "metric-card";
pub const ROLE_TITLE: &str = "title";
pub const ROLE_VALUE: &str = "value";
pub const ROLE_DETAIL: &str = "detail";

const BORDER_CLASS_PREFIX: &str = "border-";

/// What a metric card shows: a titled `value` out of `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCardData {
    pub title: String,
    pub value: f64,
    pub max: f64,
}

impl MetricCardData {
    pub fn new(title: impl Into<String>, value: f64, max: f64) -> Self {
        Self {
            title: title.into(),
            value,
            max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCardOptions {
    pub show_progress: bool,
    pub subtitle: Option<String>,
}

impl Default for MetricCardOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            subtitle: None,
        }
    }
}

pub fn create_metric_card(data: &MetricCardData, options: &MetricCardOptions) -> Element {
    let percentage = Percentage::from_ratio(data.value, data.max);
    let level = UsageLevel::from_percentage(percentage);

    let mut header = Element::new("div").class("metric-header").child(
        Element::new("span")
            .class("metric-title")
            .role(ROLE_TITLE)
            .text(data.title.clone()),
    );
    if let Some(subtitle) = &options.subtitle {
        header = header.child(
            Element::new("span")
                .class("metric-subtitle")
                .text(subtitle.clone()),
        );
    }

    let mut card = Element::new("div")
        .class("metric-card")
        .class(&level.class_name("border"))
        .attr(WIDGET_ATTR, METRIC_CARD_WIDGET)
        .child(header)
        .child(
            Element::new("div")
                .class("metric-value")
                .role(ROLE_VALUE)
                .text(format_percentage(percentage.get())),
        )
        .child(
            Element::new("div")
                .class("metric-detail")
                .role(ROLE_DETAIL)
                .text(detail_text(data.value, data.max)),
        );

    if options.show_progress {
        let bar_options = ProgressBarOptions {
            show_label: false,
            ..Default::default()
        };
        card = card.child(create_progress_bar(data.value, data.max, &bar_options));
    }
    card
}

/// Refreshes value, detail, border colour and the embedded bar.
/// Returns `false` when `card` is not a metric card.
pub fn update_metric_card(card: &mut Element, value: f64, max: f64) -> bool {
    if card.find_role(ROLE_VALUE).is_none() {
        return false;
    }
    let percentage = Percentage::from_ratio(value, max);
    let level = UsageLevel::from_percentage(percentage);

    card.swap_class_with_prefix(BORDER_CLASS_PREFIX, &level.class_name("border"));
    if let Some(el) = card.find_role_mut(ROLE_VALUE) {
        el.set_text(format_percentage(percentage.get()));
    }
    if let Some(el) = card.find_role_mut(ROLE_DETAIL) {
        el.set_text(detail_text(value, max));
    }
    if let Some(bar) = card.find_widget_mut(PROGRESS_BAR_WIDGET) {
        update_progress_bar(bar, value, max);
    }
    true
}

fn detail_text(value: f64, max: f64) -> String {
    format!("{} / {}", format_value(value, max), format_value(max, max))
}
