use super::element::{Element, TRANSITION_CLASS, WIDGET_ATTR};

pub const SPARKLINE_WIDGET: &str = "sparkline";
pub const ROLE_LINE: &str = "line";
pub const ROLE_PLACEHOLDER: &str = "placeholder";
pub const EMPTY_CLASS: &str = "sparkline-empty";
pub const EMPTY_TEXT: &str = "No data";

const WIDTH_ATTR: &str = "data-width";
const HEIGHT_ATTR: &str = "data-height";
const STROKE_WIDTH_ATTR: &str = "data-stroke-width";

#[derive(Debug, Clone, PartialEq)]
pub struct SparklineOptions {
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
}

impl Default for SparklineOptions {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 32.0,
            stroke_width: 2.0,
        }
    }
}

/// Maps samples onto a `width` x `height` box: x spreads evenly, y scales
/// linearly between the series minimum (bottom) and maximum (top).
///
/// Non-finite samples are skipped. A single sample sits at the horizontal centre,
/// and a flat series lies on the bottom edge.
pub fn sparkline_points(samples: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = if values.len() == 1 { width / 2.0 } else { i as f64 * step };
            let y = height - (v - min) / range * height;
            (x, y)
        })
        .collect()
}

/// SVG path data (`M x y L x y ...`) through `points`.
pub fn sparkline_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{} {:.2} {:.2}", command, x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a sparkline, or the "No data" placeholder when there is nothing to draw.
pub fn create_sparkline(samples: &[f64], options: &SparklineOptions) -> Element {
    let points = sparkline_points(samples, options.width, options.height);
    if points.is_empty() {
        return placeholder(options);
    }

    let line = Element::new("path")
        .class("sparkline-path")
        .class(TRANSITION_CLASS)
        .role(ROLE_LINE)
        .attr("d", sparkline_path(&points))
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("stroke-width", format!("{}", options.stroke_width));

    Element::new("svg")
        .class("sparkline")
        .attr(WIDGET_ATTR, SPARKLINE_WIDGET)
        .attr(WIDTH_ATTR, format!("{}", options.width))
        .attr(HEIGHT_ATTR, format!("{}", options.height))
        .attr(STROKE_WIDTH_ATTR, format!("{}", options.stroke_width))
        .attr("width", format!("{}", options.width))
        .attr("height", format!("{}", options.height))
        .attr("viewBox", format!("0 0 {} {}", options.width, options.height))
        .attr("preserveAspectRatio", "none")
        .child(line)
}

/// Redraws `sparkline` with new samples, switching between the line and the
/// placeholder when needed. Returns whether the element changed.
pub fn update_sparkline(sparkline: &mut Element, samples: &[f64]) -> bool {
    let defaults = SparklineOptions::default();
    let options = SparklineOptions {
        width: dimension(sparkline, WIDTH_ATTR, defaults.width),
        height: dimension(sparkline, HEIGHT_ATTR, defaults.height),
        stroke_width: dimension(sparkline, STROKE_WIDTH_ATTR, defaults.stroke_width),
    };
    let points = sparkline_points(samples, options.width, options.height);

    if points.is_empty() {
        if sparkline.has_class(EMPTY_CLASS) {
            return false;
        }
        *sparkline = placeholder(&options);
        return true;
    }

    match sparkline.find_role_mut(ROLE_LINE) {
        Some(line) => line.set_attr("d", sparkline_path(&points)),
        None => {
            *sparkline = create_sparkline(samples, &options);
            true
        }
    }
}

fn placeholder(options: &SparklineOptions) -> Element {
    Element::new("div")
        .class("sparkline")
        .class(EMPTY_CLASS)
        .attr(WIDGET_ATTR, SPARKLINE_WIDGET)
        .attr(WIDTH_ATTR, format!("{}", options.width))
        .attr(HEIGHT_ATTR, format!("{}", options.height))
        .attr(STROKE_WIDTH_ATTR, format!("{}", options.stroke_width))
        .child(
            Element::new("span")
                .class("text-muted")
                .role(ROLE_PLACEHOLDER)
                .text(EMPTY_TEXT),
        )
}

fn dimension(element: &Element, attr: &str, fallback: f64) -> f64 {
    element
        .get_attr(attr)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(fallback)
}
