use super::element::{Element, TRANSITION_CLASS, WIDGET_ATTR};
use super::format::format_percentage;
use super::level::UsageLevel;
use crate::core::domain::value_object::Percentage;

pub const PROGRESS_BAR_WIDGET: &str = "progress-bar";
pub const ROLE_FILL: &str = "fill";
pub const ROLE_LABEL: &str = "label";

const FILL_CLASS_PREFIX: &str = "bg-";

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBarOptions {
    pub show_label: bool,
    pub height_px: u32,
    pub animated: bool,
    pub striped: bool,
}

impl Default for ProgressBarOptions {
    fn default() -> Self {
        Self {
            show_label: true,
            height_px: 8,
            animated: true,
            striped: false,
        }
    }
}

/// Builds a horizontal bar filled to `value / max`, clamped to `[0,100]` percent.
pub fn create_progress_bar(value: f64, max: f64, options: &ProgressBarOptions) -> Element {
    let percentage = Percentage::from_ratio(value, max);
    let level = UsageLevel::from_percentage(percentage);

    let mut fill = Element::new("div")
        .class("progress-bar")
        .class(&level.class_name("bg"))
        .role(ROLE_FILL)
        .attr("role", "progressbar")
        .attr("aria-valuemin", "0")
        .attr("aria-valuemax", "100")
        .attr("aria-valuenow", aria_value(percentage))
        .style("width", fill_width(percentage));
    if options.animated {
        fill = fill.class(TRANSITION_CLASS);
    }
    if options.striped {
        fill = fill.class("progress-bar-striped");
    }

    let mut bar = Element::new("div")
        .class("progress")
        .attr(WIDGET_ATTR, PROGRESS_BAR_WIDGET)
        .style("height", format!("{}px", options.height_px))
        .child(fill);
    if options.show_label {
        bar = bar.child(
            Element::new("span")
                .class("progress-label")
                .role(ROLE_LABEL)
                .text(format_percentage(percentage.get())),
        );
    }
    bar
}

/// Updates an existing bar in place. Returns `false` when `bar` has no fill element.
pub fn update_progress_bar(bar: &mut Element, value: f64, max: f64) -> bool {
    let percentage = Percentage::from_ratio(value, max);
    let level = UsageLevel::from_percentage(percentage);

    let Some(fill) = bar.find_role_mut(ROLE_FILL) else {
        return false;
    };
    fill.set_style("width", fill_width(percentage));
    fill.set_attr("aria-valuenow", aria_value(percentage));
    fill.swap_class_with_prefix(FILL_CLASS_PREFIX, &level.class_name("bg"));

    if let Some(label) = bar.find_role_mut(ROLE_LABEL) {
        label.set_text(format_percentage(percentage.get()));
    }
    true
}

fn fill_width(percentage: Percentage) -> String {
    format!("{:.1}%", percentage.get())
}

fn aria_value(percentage: Percentage) -> String {
    format!("{:.0}", percentage.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(bar: &Element) -> &Element {
        bar.find_role(ROLE_FILL).expect("fill element")
    }

    #[test]
    fn test_create_progress_bar() {
        let bar = create_progress_bar(42.0, 100.0, &ProgressBarOptions::default());
        assert_eq!(bar.widget_name(), Some(PROGRESS_BAR_WIDGET));
        assert_eq!(bar.get_style("height"), Some("8px"));
        assert_eq!(fill(&bar).get_style("width"), Some("42.0%"));
        assert!(fill(&bar).has_class("bg-success"));
        assert!(fill(&bar).has_class(TRANSITION_CLASS));
        assert_eq!(
            bar.find_role(ROLE_LABEL).and_then(|l| l.text_content()),
            Some("42.0%")
        );
    }

    #[test]
    fn test_value_above_max_is_clamped() {
        let bar = create_progress_bar(150.0, 100.0, &ProgressBarOptions::default());
        assert_eq!(fill(&bar).get_style("width"), Some("100.0%"));
        assert!(fill(&bar).has_class("bg-danger"));
    }

    #[test]
    fn test_zero_max_renders_empty_bar() {
        let bar = create_progress_bar(10.0, 0.0, &ProgressBarOptions::default());
        assert_eq!(fill(&bar).get_style("width"), Some("0.0%"));
        assert!(!bar.to_html().contains("NaN"));
    }

    #[test]
    fn test_label_and_animation_options() {
        let options = ProgressBarOptions {
            show_label: false,
            height_px: 4,
            animated: false,
            striped: true,
        };
        let bar = create_progress_bar(5.0, 10.0, &options);
        assert!(bar.find_role(ROLE_LABEL).is_none());
        assert!(!fill(&bar).has_class(TRANSITION_CLASS));
        assert!(fill(&bar).has_class("progress-bar-striped"));
    }

    #[test]
    fn test_update_changes_width_and_level_only() {
        let mut bar = create_progress_bar(10.0, 100.0, &ProgressBarOptions::default());
        assert!(update_progress_bar(&mut bar, 95.0, 100.0));

        let fill = fill(&bar);
        assert_eq!(fill.get_style("width"), Some("95.0%"));
        assert_eq!(fill.get_attr("aria-valuenow"), Some("95"));
        assert!(fill.has_class("bg-danger"));
        assert!(!fill.has_class("bg-success"));
        assert!(fill.has_class("progress-bar"));
        assert!(fill.has_class(TRANSITION_CLASS));
        assert_eq!(
            bar.find_role(ROLE_LABEL).and_then(|l| l.text_content()),
            Some("95.0%")
        );
    }

    #[test]
    fn test_update_without_fill_is_noop() {
        let mut el = Element::new("div");
        assert!(!update_progress_bar(&mut el, 1.0, 2.0));
        assert_eq!(el, Element::new("div"));
    }
}
