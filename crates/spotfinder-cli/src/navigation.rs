//! App shell navigation as an explicit state machine.
//!
//! Screens: Splash → Home, then Home/Map/Forecast via the bottom tab bar and
//! Menu via the circle button. History is a back stack rooted at Home once
//! the splash has finished.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

/// How long the splash screen stays up.
pub const SPLASH_DELAY: Duration = Duration::from_millis(1500);

/// Map screen defaults.
pub mod map {
    use std::time::Duration;

    use serde::Serialize;

    /// Campus centre.
    pub const CAMPUS_LAT: f64 = 7.063972;
    pub const CAMPUS_LON: f64 = 125.595690;
    pub const START_ZOOM: f64 = 19.5;

    /// The loading overlay stays at least this long.
    pub const MIN_OVERLAY: Duration = Duration::from_millis(500);
    /// The loading overlay never outlives this.
    pub const MAX_OVERLAY: Duration = Duration::from_millis(5000);

    /// When the loading overlay goes away, given when the first tile arrived.
    ///
    /// Held for at least [`MIN_OVERLAY`]; dropped at [`MAX_OVERLAY`] even if
    /// no tile ever loads.
    pub fn overlay_hides_after(first_tile: Option<Duration>) -> Duration {
        match first_tile {
            Some(at) => at.clamp(MIN_OVERLAY, MAX_OVERLAY),
            None => MAX_OVERLAY,
        }
    }

    /// What the map screen opens on.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct MapView {
        pub lat: f64,
        pub lon: f64,
        pub zoom: f64,
        pub overlay_ms: u64,
    }

    impl MapView {
        pub fn opening(first_tile: Option<Duration>) -> Self {
            Self {
                lat: CAMPUS_LAT,
                lon: CAMPUS_LON,
                zoom: START_ZOOM,
                overlay_ms: overlay_hides_after(first_tile).as_millis() as u64,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Splash,
    Home,
    Map,
    Forecast,
    Menu,
}

impl Screen {
    pub fn route(self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::Home => "home",
            Screen::Map => "map",
            Screen::Forecast => "forecast",
            Screen::Menu => "menu",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// Bottom bar tabs, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Map,
    Forecast,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Map, Tab::Forecast];

    pub fn screen(self) -> Screen {
        match self {
            Tab::Home => Screen::Home,
            Tab::Map => Screen::Map,
            Tab::Forecast => Screen::Forecast,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Map => "Map",
            Tab::Forecast => "Forecast",
        }
    }

    fn for_screen(screen: Screen) -> Option<Tab> {
        Self::ALL.into_iter().find(|tab| tab.screen() == screen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    SplashFinished,
    SelectTab(Tab),
    CircleButton,
    Back,
}

impl NavEvent {
    /// Command-line token for this event.
    pub fn name(self) -> &'static str {
        match self {
            NavEvent::SplashFinished => "splash",
            NavEvent::SelectTab(tab) => tab.screen().route(),
            NavEvent::CircleButton => "menu",
            NavEvent::Back => "back",
        }
    }
}

impl FromStr for NavEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "splash" | "splash-finished" => Ok(NavEvent::SplashFinished),
            "home" => Ok(NavEvent::SelectTab(Tab::Home)),
            "map" => Ok(NavEvent::SelectTab(Tab::Map)),
            "forecast" => Ok(NavEvent::SelectTab(Tab::Forecast)),
            "menu" | "circle" => Ok(NavEvent::CircleButton),
            "back" => Ok(NavEvent::Back),
            other => Err(format!(
                "unknown navigation event '{}' (expected splash, home, map, forecast, menu, back)",
                other
            )),
        }
    }
}

/// Result of feeding one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Now showing this screen (possibly unchanged).
    Showing(Screen),
    /// The event does not apply to the current screen.
    Ignored,
    /// Back pressed on the root screen; the app closes.
    Exit,
}

/// What the bottom bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BottomBar {
    /// Highlighted tab; none while Menu is open or off-tab.
    pub selected: Option<Tab>,
    pub menu_active: bool,
}

/// Back-stack navigator.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Splash],
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Home)
    }

    pub fn history(&self) -> &[Screen] {
        &self.stack
    }

    /// Hidden on the splash screen.
    pub fn bottom_bar(&self) -> Option<BottomBar> {
        let current = self.current();
        if current == Screen::Splash {
            return None;
        }
        let menu_active = current == Screen::Menu;
        Some(BottomBar {
            selected: if menu_active { None } else { Tab::for_screen(current) },
            menu_active,
        })
    }

    pub fn handle(&mut self, event: NavEvent) -> NavOutcome {
        let current = self.current();
        if current == Screen::Splash {
            return match event {
                NavEvent::SplashFinished => {
                    self.stack.clear();
                    self.stack.push(Screen::Home);
                    NavOutcome::Showing(Screen::Home)
                }
                _ => NavOutcome::Ignored,
            };
        }

        match event {
            NavEvent::SplashFinished => NavOutcome::Ignored,
            NavEvent::SelectTab(tab) => {
                if current == Screen::Menu {
                    self.stack.pop();
                }
                self.navigate_tab(tab.screen());
                NavOutcome::Showing(self.current())
            }
            NavEvent::CircleButton => {
                if current == Screen::Menu {
                    self.stack.pop();
                } else {
                    self.stack.push(Screen::Menu);
                }
                NavOutcome::Showing(self.current())
            }
            NavEvent::Back => {
                if self.stack.len() <= 1 {
                    return NavOutcome::Exit;
                }
                self.stack.pop();
                NavOutcome::Showing(self.current())
            }
        }
    }

    /// Single-top navigation with Home as the history root.
    fn navigate_tab(&mut self, target: Screen) {
        while self.stack.len() > 1 && self.current() != Screen::Home {
            self.stack.pop();
        }
        if self.current() != target {
            self.stack.push(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Navigator {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavEvent::SplashFinished), NavOutcome::Showing(Screen::Home));
        nav
    }

    #[test]
    fn test_starts_on_splash_without_bar() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), Screen::Splash);
        assert_eq!(nav.bottom_bar(), None);
        assert_eq!(nav.handle(NavEvent::SelectTab(Tab::Map)), NavOutcome::Ignored);
        assert_eq!(nav.handle(NavEvent::CircleButton), NavOutcome::Ignored);
        assert_eq!(nav.handle(NavEvent::Back), NavOutcome::Ignored);
        assert_eq!(nav.current(), Screen::Splash);
    }

    #[test]
    fn test_splash_is_removed_from_history() {
        let mut nav = started();
        assert_eq!(nav.history(), &[Screen::Home]);
        assert_eq!(nav.handle(NavEvent::Back), NavOutcome::Exit);
        assert_eq!(nav.handle(NavEvent::SplashFinished), NavOutcome::Ignored);
    }

    #[test]
    fn test_tabs_are_single_top_rooted_at_home() {
        let mut nav = started();
        nav.handle(NavEvent::SelectTab(Tab::Map));
        nav.handle(NavEvent::SelectTab(Tab::Forecast));
        assert_eq!(nav.history(), &[Screen::Home, Screen::Forecast]);

        nav.handle(NavEvent::SelectTab(Tab::Forecast));
        assert_eq!(nav.history(), &[Screen::Home, Screen::Forecast]);

        nav.handle(NavEvent::SelectTab(Tab::Home));
        assert_eq!(nav.history(), &[Screen::Home]);
    }

    #[test]
    fn test_circle_button_toggles_menu() {
        let mut nav = started();
        nav.handle(NavEvent::SelectTab(Tab::Map));

        assert_eq!(nav.handle(NavEvent::CircleButton), NavOutcome::Showing(Screen::Menu));
        assert_eq!(
            nav.bottom_bar(),
            Some(BottomBar {
                selected: None,
                menu_active: true
            })
        );

        assert_eq!(nav.handle(NavEvent::CircleButton), NavOutcome::Showing(Screen::Map));
        assert_eq!(
            nav.bottom_bar(),
            Some(BottomBar {
                selected: Some(Tab::Map),
                menu_active: false
            })
        );
    }

    #[test]
    fn test_tab_select_closes_menu_first() {
        let mut nav = started();
        nav.handle(NavEvent::SelectTab(Tab::Map));
        nav.handle(NavEvent::CircleButton);

        assert_eq!(
            nav.handle(NavEvent::SelectTab(Tab::Forecast)),
            NavOutcome::Showing(Screen::Forecast)
        );
        assert_eq!(nav.history(), &[Screen::Home, Screen::Forecast]);
    }

    #[test]
    fn test_back_pops_menu_then_tab() {
        let mut nav = started();
        nav.handle(NavEvent::SelectTab(Tab::Forecast));
        nav.handle(NavEvent::CircleButton);

        assert_eq!(nav.handle(NavEvent::Back), NavOutcome::Showing(Screen::Forecast));
        assert_eq!(nav.handle(NavEvent::Back), NavOutcome::Showing(Screen::Home));
        assert_eq!(nav.handle(NavEvent::Back), NavOutcome::Exit);
    }

    #[test]
    fn test_parse_events() {
        assert_eq!("splash".parse::<NavEvent>(), Ok(NavEvent::SplashFinished));
        assert_eq!("Map".parse::<NavEvent>(), Ok(NavEvent::SelectTab(Tab::Map)));
        assert_eq!("menu".parse::<NavEvent>(), Ok(NavEvent::CircleButton));
        assert!("settings".parse::<NavEvent>().is_err());

        for token in ["splash", "home", "map", "forecast", "menu", "back"] {
            let event: NavEvent = token.parse().expect("known token");
            assert_eq!(event.name(), token);
        }
    }

    #[test]
    fn test_map_overlay_timing() {
        use map::*;

        assert_eq!(overlay_hides_after(Some(Duration::ZERO)), MIN_OVERLAY, "minimum display time");
        assert_eq!(overlay_hides_after(Some(Duration::from_millis(499))), MIN_OVERLAY);
        assert_eq!(
            overlay_hides_after(Some(Duration::from_millis(1200))),
            Duration::from_millis(1200)
        );
        assert_eq!(overlay_hides_after(Some(Duration::from_secs(9))), MAX_OVERLAY, "hard timeout");
        assert_eq!(overlay_hides_after(None), MAX_OVERLAY, "tiles never arrive");
    }

    #[test]
    fn test_map_view_opens_on_campus() {
        let view = map::MapView::opening(None);
        assert_eq!(view.lat, map::CAMPUS_LAT);
        assert_eq!(view.lon, map::CAMPUS_LON);
        assert_eq!(view.zoom, 19.5);
        assert_eq!(view.overlay_ms, 5000);
    }
}
