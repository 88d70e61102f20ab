use controlroom_protocol::{
    CardPatch, Classification, HudAction, HudMessage, SectorMap, VisualCommand,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Shown,
    Hidden,
}

/// Last-rendered visual attributes of one sector card. Values persist across
/// `close`; only a later `open`/`update` overwrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVisual {
    pub bar_width_pct: f64,
    pub label: String,
    pub status: Classification,
    pub critical: bool,
}

/// Explicit stand-in for what the original kept implicitly in the document:
/// the container's visibility and every card's rendered attributes. Cards are
/// registered up front; a sector id with no registered card has no matching
/// element and is skipped during rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayState {
    visibility: Visibility,
    cards: BTreeMap<String, Option<CardVisual>>,
}

impl DisplayState {
    pub fn with_cards<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visibility: Visibility::Hidden,
            cards: ids.into_iter().map(|id| (id.into(), None)).collect(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn card(&self, id: &str) -> Option<&CardVisual> {
        self.cards.get(id).and_then(|v| v.as_ref())
    }

    pub fn has_card(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }
}

/// Updates every registered card named in `sectors` and returns one patch per
/// card touched. Ids with no registered card are skipped silently; registered
/// cards absent from `sectors` keep their previous visuals.
pub fn render_grid(state: &mut DisplayState, sectors: &SectorMap) -> Vec<CardPatch> {
    let mut patches = Vec::new();
    for (id, status) in sectors {
        let Some(slot) = state.cards.get_mut(id) else {
            continue;
        };
        let health = status.health();
        let class = Classification::from_health(health);
        let visual = CardVisual {
            bar_width_pct: health,
            label: format!("{}", health.floor() as i64),
            status: class,
            critical: class == Classification::Critical,
        };
        patches.push(CardPatch {
            card: id.clone(),
            bar_width_pct: visual.bar_width_pct,
            label: visual.label.clone(),
            status: visual.status,
            critical: visual.critical,
            bar_fill: class.bar_fill().to_string(),
        });
        *slot = Some(visual);
    }
    patches
}

/// Turns inbound host messages into visual commands.
///
/// Two visibility states, initial `Hidden`. `open` shows and renders, `close`
/// hides without touching card visuals, `update` renders without touching
/// visibility. Anything else is ignored.
#[derive(Debug, Clone)]
pub struct HudController {
    state: DisplayState,
}

impl HudController {
    pub fn new(state: DisplayState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn handle(&mut self, msg: &HudMessage) -> Vec<VisualCommand> {
        match msg.action {
            HudAction::Open => {
                self.state.visibility = Visibility::Shown;
                let mut cmds = vec![VisualCommand::Show];
                if let Some(sectors) = &msg.sectors {
                    cmds.extend(render_grid(&mut self.state, sectors).into_iter().map(VisualCommand::Card));
                }
                cmds
            }
            HudAction::Close => {
                self.state.visibility = Visibility::Hidden;
                vec![VisualCommand::Hide]
            }
            HudAction::Update => match &msg.sectors {
                Some(sectors) => render_grid(&mut self.state, sectors)
                    .into_iter()
                    .map(VisualCommand::Card)
                    .collect(),
                None => Vec::new(),
            },
            HudAction::Unknown => {
                tracing::debug!("ignoring unrecognized hud action");
                Vec::new()
            }
        }
    }
}
