// Overflow menu for the tab strip.
// Pure function of layout measurements supplied by the host and the current strip.

use serde::{Deserialize, Serialize};

use crate::state::TabStrip;

pub const ALL_TABS_VISIBLE: &str = "All tabs visible";

/// Horizontal extent of a rendered element, in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub left: f64,
    pub right: f64,
}

impl Span {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn contains(&self, other: &Span) -> bool {
        other.left >= self.left && other.right <= self.right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenTab {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Index to pass to `select_tab`. `None` for the placeholder entry.
    pub index: Option<usize>,
    pub active: bool,
    pub disabled: bool,
}

/// Tabs whose rendered span is not fully inside the visible `container`.
///
/// `tab_spans[i]` measures `strip.tabs[i]`; extra spans are ignored. When
/// nothing is hidden the list holds a single disabled `placeholder` entry.
pub fn hidden_tabs(
    strip: &TabStrip,
    container: Span,
    tab_spans: &[Span],
    placeholder: &str,
) -> Vec<HiddenTab> {
    let mut hidden: Vec<HiddenTab> = strip
        .tabs
        .iter()
        .zip(tab_spans)
        .enumerate()
        .filter(|(_, (_, span))| !container.contains(span))
        .map(|(index, (tab, _))| HiddenTab {
            label: tab.label.clone(),
            icon: tab.icon.clone(),
            index: Some(index),
            active: strip.active == Some(index),
            disabled: false,
        })
        .collect();

    if hidden.is_empty() {
        hidden.push(HiddenTab {
            label: placeholder.to_string(),
            icon: None,
            index: None,
            active: false,
            disabled: true,
        });
    }
    hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::navigation::RouteTarget;
    use crate::state::{Tab, TabId};

    fn strip(n: usize, active: usize) -> TabStrip {
        let tabs = (0..n)
            .map(|i| Tab {
                id: TabId(i as u64 + 1),
                label: format!("tab {}", i),
                target: RouteTarget::from(format!("/t/{}", i).as_str()),
                icon: None,
            })
            .collect();
        TabStrip { tabs, active: Some(active) }
    }

    /// 100px tabs laid out from `scroll` onwards.
    fn spans(n: usize, scroll: f64) -> Vec<Span> {
        (0..n)
            .map(|i| Span::new(i as f64 * 100.0 - scroll, (i + 1) as f64 * 100.0 - scroll))
            .collect()
    }

    fn visible_check(strip: TabStrip, container: Span, spans: Vec<Span>) -> Vec<HiddenTab> {
        hidden_tabs(&strip, container, &spans, ALL_TABS_VISIBLE)
    }

    #[test]
    fn test_tabs_past_the_right_edge_are_hidden() {
        let hidden = visible_check(strip(5, 4), Span::new(0.0, 320.0), spans(5, 0.0));
        let indexes: Vec<_> = hidden.iter().map(|h| h.index).collect();
        assert_eq!(indexes, vec![Some(3), Some(4)]);
        assert!(hidden[1].active);
        assert!(!hidden[0].active);
    }

    #[test]
    fn test_partially_scrolled_tabs_are_hidden() {
        let hidden = visible_check(strip(4, 0), Span::new(0.0, 300.0), spans(4, 50.0));
        let indexes: Vec<_> = hidden.iter().filter_map(|h| h.index).collect();
        // tab 0 starts at -50, tab 3 ends at 350
        assert_eq!(indexes, vec![0, 3]);
    }

    #[test]
    fn test_placeholder_when_everything_fits() {
        let hidden = hidden_tabs(
            &strip(2, 0),
            Span::new(0.0, 500.0),
            &spans(2, 0.0),
            "Nothing hidden",
        );
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].label, "Nothing hidden");
        assert!(hidden[0].disabled);
        assert_eq!(hidden[0].index, None);
    }

    #[test]
    fn test_missing_measurements_are_skipped() {
        let hidden = visible_check(strip(3, 0), Span::new(0.0, 50.0), spans(1, 0.0));
        assert_eq!(hidden.iter().filter_map(|h| h.index).collect::<Vec<_>>(), vec![0]);
    }
}
