/// Navigation link pointing at a pane by fragment (`#daf`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPane {
    pub id: String,
    pub visible: bool,
}

/// Active-link and visible-pane state of a tab strip
#[derive(Debug, Clone, Default)]
pub struct TabController {
    nav: Vec<NavItem>,
    panes: Vec<TabPane>,
}

impl TabController {
    /// One link and one pane per id; the first is active
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut controller = Self::default();
        for (i, id) in ids.into_iter().enumerate() {
            let id = id.into();
            controller.nav.push(NavItem {
                href: format!("#{}", id),
                active: i == 0,
            });
            controller.panes.push(TabPane { id, visible: i == 0 });
        }
        controller
    }

    /// Activate the link `href` and show its pane
    ///
    /// Returns false and changes nothing when no pane matches the fragment.
    pub fn click(&mut self, href: &str) -> bool {
        let target = href.strip_prefix('#').unwrap_or(href);
        if !self.panes.iter().any(|p| p.id == target) {
            tracing::debug!("No pane for {}", href);
            return false;
        }

        for item in &mut self.nav {
            item.active = item.href.strip_prefix('#') == Some(target);
        }
        for pane in &mut self.panes {
            pane.visible = pane.id == target;
        }
        true
    }

    pub fn active_pane(&self) -> Option<&str> {
        self.panes.iter().find(|p| p.visible).map(|p| p.id.as_str())
    }

    pub fn nav(&self) -> &[NavItem] {
        &self.nav
    }

    pub fn panes(&self) -> &[TabPane] {
        &self.panes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_switches_pane() {
        let mut tabs = TabController::new(["anns", "daf"]);
        assert_eq!(tabs.active_pane(), Some("anns"));

        assert!(tabs.click("#daf"));
        assert_eq!(tabs.active_pane(), Some("daf"));
        assert!(!tabs.nav()[0].active);
        assert!(tabs.nav()[1].active);
        assert_eq!(tabs.panes().iter().filter(|p| p.visible).count(), 1);
    }

    #[test]
    fn test_bare_id_click_activates_link() {
        let mut tabs = TabController::new(["anns", "daf"]);
        assert!(tabs.click("daf"));
        assert_eq!(tabs.active_pane(), Some("daf"));
        let active: Vec<bool> = tabs.nav().iter().map(|n| n.active).collect();
        assert_eq!(active, vec![false, true]);
    }

    #[test]
    fn test_unknown_fragment_is_ignored() {
        let mut tabs = TabController::new(["anns", "daf"]);
        assert!(!tabs.click("#zara"));
        assert_eq!(tabs.active_pane(), Some("anns"));
    }
}
