use serde::{Deserialize, Serialize};

/// The full-screen views, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Welcome,
    Wish,
    GameIntro,
    Game,
    GiftPicker,
    FinalWish,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Welcome,
        Screen::Wish,
        Screen::GameIntro,
        Screen::Game,
        Screen::GiftPicker,
        Screen::FinalWish,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Welcome => "welcome",
            Self::Wish => "wish",
            Self::GameIntro => "game-intro",
            Self::Game => "game",
            Self::GiftPicker => "gift-picker",
            Self::FinalWish => "final-wish",
        };
        write!(f, "{name}")
    }
}

/// Stable identifier for a gift in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GiftId(pub String);

/// One pickable gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftOption {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const GIFT_CATALOG: [GiftOption; 3] = [
    GiftOption {
        id: "sweet-treats",
        title: "Sweet Treats",
        description: "A box of delicious donuts or a special cake just for you!",
    },
    GiftOption {
        id: "jewelry",
        title: "All-time Favs, Jewelry",
        description: "A beautiful ring or bracelet to make your special day shine!",
    },
    GiftOption {
        id: "dream-heels",
        title: "Dream Heels",
        description: "Help getting those crazy expensive heels you've been eyeing!",
    },
];

pub fn find_gift(id: &str) -> Option<&'static GiftOption> {
    GIFT_CATALOG.iter().find(|g| g.id == id)
}

/// Cycles through the catalog one card at a time, wrapping at both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiftCarousel {
    index: usize,
}

impl GiftCarousel {
    pub fn current(&self) -> &'static GiftOption {
        &GIFT_CATALOG[self.index]
    }

    pub fn next(&mut self) -> &'static GiftOption {
        self.index = (self.index + 1) % GIFT_CATALOG.len();
        self.current()
    }

    pub fn prev(&mut self) -> &'static GiftOption {
        self.index = (self.index + GIFT_CATALOG.len() - 1) % GIFT_CATALOG.len();
        self.current()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The current screen has no plain "next" action.
    NotAdvanceable(Screen),
    /// The action is only valid on a different screen.
    WrongScreen { expected: Screen, actual: Screen },
    UnknownGift(String),
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAdvanceable(s) => write!(f, "screen {s} cannot be advanced directly"),
            Self::WrongScreen { expected, actual } => {
                write!(f, "expected screen {expected}, currently on {actual}")
            },
            Self::UnknownGift(id) => write!(f, "unknown gift: {id}"),
        }
    }
}

impl std::error::Error for FlowError {}

/// Linear screen sequence plus the gift chosen along the way.
#[derive(Debug, Clone)]
pub struct Experience {
    screen: Screen,
    selected_gift: Option<GiftId>,
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

impl Experience {
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            selected_gift: None,
        }
    }

    /// Resume with a gift that was chosen in an earlier session.
    pub fn with_selected_gift(mut self, gift: GiftId) -> Self {
        self.selected_gift = Some(gift);
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_gift(&self) -> Option<&GiftId> {
        self.selected_gift.as_ref()
    }

    fn transition(&mut self, to: Screen) -> Screen {
        tracing::info!(from = %self.screen, to = %to, "Screen transition");
        self.screen = to;
        to
    }

    /// The "next" button on the static screens.
    pub fn advance(&mut self) -> Result<Screen, FlowError> {
        let next = match self.screen {
            Screen::Welcome => Screen::Wish,
            Screen::Wish => Screen::GameIntro,
            Screen::GameIntro => Screen::Game,
            other => return Err(FlowError::NotAdvanceable(other)),
        };
        Ok(self.transition(next))
    }

    /// Leave the mini-game, either because it completed or because it was skipped.
    pub fn finish_game(&mut self) -> Result<Screen, FlowError> {
        self.expect_screen(Screen::Game)?;
        Ok(self.transition(Screen::GiftPicker))
    }

    /// Record the chosen gift and show the final message.
    pub fn select_gift(&mut self, id: &str) -> Result<Screen, FlowError> {
        self.expect_screen(Screen::GiftPicker)?;
        let gift = find_gift(id).ok_or_else(|| FlowError::UnknownGift(id.to_string()))?;
        tracing::info!(gift = gift.id, "Gift selected");
        self.selected_gift = Some(GiftId(gift.id.to_string()));
        Ok(self.transition(Screen::FinalWish))
    }

    fn expect_screen(&self, expected: Screen) -> Result<(), FlowError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(FlowError::WrongScreen {
                expected,
                actual: self.screen,
            })
        }
    }
}
