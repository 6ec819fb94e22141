use super::element::{Element, TRANSITION_CLASS, WIDGET_ATTR};
use super::level::UsageLevel;
use crate::core::domain::value_object::Percentage;
use std::f64::consts::PI;

pub const GAUGE_WIDGET: &str = "gauge";
pub const ROLE_VALUE_ARC: &str = "value-arc";
pub const ROLE_VALUE_TEXT: &str = "value-text";
pub const ROLE_GAUGE_LABEL: &str = "gauge-label";

const CIRCUMFERENCE_ATTR: &str = "data-circumference";
const STROKE_CLASS_PREFIX: &str = "stroke-";

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeOptions {
    /// Square side in pixels.
    pub size: u32,
    pub stroke_width: u32,
    pub label: Option<String>,
    pub animated: bool,
}

impl Default for GaugeOptions {
    fn default() -> Self {
        Self {
            size: 120,
            stroke_width: 10,
            label: None,
            animated: true,
        }
    }
}

impl GaugeOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn radius(&self) -> f64 {
        ((self.size as f64 - self.stroke_width as f64) / 2.0).max(0.0)
    }
}

/// Arc length left undrawn for `percentage` on a circle of `circumference`.
pub fn dash_offset(circumference: f64, percentage: Percentage) -> f64 {
    circumference * (1.0 - percentage.get() / 100.0)
}

/// Builds a circular gauge: a background track plus a value arc whose dash
/// offset encodes the percentage.
pub fn create_gauge(value: f64, max: f64, options: &GaugeOptions) -> Element {
    let percentage = Percentage::from_ratio(value, max);
    let level = UsageLevel::from_percentage(percentage);
    let size = options.size as f64;
    let center = size / 2.0;
    let radius = options.radius();
    let circumference = 2.0 * PI * radius;

    let track = Element::new("circle")
        .class("gauge-track")
        .attr("cx", num(center))
        .attr("cy", num(center))
        .attr("r", num(radius))
        .attr("fill", "none")
        .attr("stroke-width", options.stroke_width.to_string());

    let mut arc = Element::new("circle")
        .class("gauge-value")
        .class(&level.class_name("stroke"))
        .role(ROLE_VALUE_ARC)
        .attr("cx", num(center))
        .attr("cy", num(center))
        .attr("r", num(radius))
        .attr("fill", "none")
        .attr("stroke-width", options.stroke_width.to_string())
        .attr("stroke-linecap", "round")
        .attr("stroke-dasharray", num(circumference))
        .attr("stroke-dashoffset", num(dash_offset(circumference, percentage)))
        .attr(CIRCUMFERENCE_ATTR, num(circumference))
        .attr("transform", format!("rotate(-90 {} {})", num(center), num(center)));
    if options.animated {
        arc = arc.class(TRANSITION_CLASS);
    }

    let svg = Element::new("svg")
        .class("gauge-svg")
        .attr("width", options.size.to_string())
        .attr("height", options.size.to_string())
        .attr("viewBox", format!("0 0 {} {}", options.size, options.size))
        .child(track)
        .child(arc);

    let mut text = Element::new("div").class("gauge-text").child(
        Element::new("span")
            .class("gauge-value-text")
            .role(ROLE_VALUE_TEXT)
            .text(value_text(percentage)),
    );
    if let Some(label) = &options.label {
        text = text.child(
            Element::new("span")
                .class("gauge-label")
                .role(ROLE_GAUGE_LABEL)
                .text(label.clone()),
        );
    }

    Element::new("div")
        .class("gauge")
        .attr(WIDGET_ATTR, GAUGE_WIDGET)
        .style("width", format!("{}px", options.size))
        .style("height", format!("{}px", options.size))
        .child(svg)
        .child(text)
}

/// Updates the arc offset, colour and value text of an existing gauge.
/// Returns `false` when `gauge` has no value arc.
pub fn update_gauge(gauge: &mut Element, value: f64, max: f64) -> bool {
    let percentage = Percentage::from_ratio(value, max);
    let level = UsageLevel::from_percentage(percentage);

    let Some(arc) = gauge.find_role_mut(ROLE_VALUE_ARC) else {
        return false;
    };
    let Some(circumference) = arc
        .get_attr(CIRCUMFERENCE_ATTR)
        .and_then(|c| c.parse::<f64>().ok())
    else {
        return false;
    };
    arc.set_attr("stroke-dashoffset", num(dash_offset(circumference, percentage)));
    arc.swap_class_with_prefix(STROKE_CLASS_PREFIX, &level.class_name("stroke"));

    if let Some(text) = gauge.find_role_mut(ROLE_VALUE_TEXT) {
        text.set_text(value_text(percentage));
    }
    true
}

fn value_text(percentage: Percentage) -> String {
    format!("{:.0}%", percentage.get())
}

fn num(value: f64) -> String {
    format!("{:.2}", value)
}
