//! Interaction replies, independent of how they reach Discord.
//!
//! The gateway bot turns a [`Reply`] into serenity builders; the HTTP
//! transport serialises it to the interaction response JSON.

use serde_json::{json, Value};
use serenity::builder::{CreateComponents, CreateInteractionResponse};
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::InteractionResponseType;

/// Discord allows this many buttons in one action row.
pub const MAX_BUTTONS_PER_ROW: usize = 5;
/// Discord allows this many action rows on one message.
pub const MAX_ROWS: usize = 5;

const EPHEMERAL_FLAG: u64 = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A new message answering the interaction.
    Message,
    /// Replaces the message the clicked button sits on.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Success,
    Danger,
    Secondary,
}

impl ButtonKind {
    pub fn style(&self) -> ButtonStyle {
        match self {
            ButtonKind::Success => ButtonStyle::Success,
            ButtonKind::Danger => ButtonStyle::Danger,
            ButtonKind::Secondary => ButtonStyle::Secondary,
        }
    }

    /// Numeric style used in the raw interaction API.
    pub fn code(&self) -> u8 {
        match self {
            ButtonKind::Secondary => 2,
            ButtonKind::Success => 3,
            ButtonKind::Danger => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub custom_id: String,
    pub label: String,
    pub kind: ButtonKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub content: String,
    pub rows: Vec<Vec<MenuButton>>,
    pub ephemeral: bool,
}

impl Reply {
    pub fn message(content: impl Into<String>) -> Self {
        Reply {
            kind: ReplyKind::Message,
            content: content.into(),
            rows: Vec::new(),
            ephemeral: false,
        }
    }

    /// A message only the invoking member sees.
    pub fn notice(content: impl Into<String>) -> Self {
        Reply {
            ephemeral: true,
            ..Reply::message(content)
        }
    }

    /// Rewrites the menu message and strips its buttons.
    pub fn update(content: impl Into<String>) -> Self {
        Reply {
            kind: ReplyKind::Update,
            ..Reply::message(content)
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<MenuButton>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn response_type(&self) -> InteractionResponseType {
        match self.kind {
            ReplyKind::Message => InteractionResponseType::ChannelMessageWithSource,
            ReplyKind::Update => InteractionResponseType::UpdateMessage,
        }
    }

    pub fn components(&self) -> CreateComponents {
        let mut components = CreateComponents::default();
        for row in &self.rows {
            components.create_action_row(|action_row| {
                for button in row {
                    action_row.create_button(|b| {
                        b.custom_id(&button.custom_id)
                            .label(&button.label)
                            .style(button.kind.style())
                    });
                }
                action_row
            });
        }
        components
    }

    /// Fills a serenity interaction response with this reply.
    pub fn write_response<'a, 'b>(
        &self,
        response: &'b mut CreateInteractionResponse<'a>,
    ) -> &'b mut CreateInteractionResponse<'a> {
        response
            .kind(self.response_type())
            .interaction_response_data(|data| {
                data.content(&self.content).set_components(self.components());
                if self.ephemeral {
                    data.ephemeral(true);
                }
                data
            })
    }

    /// Raw interaction response body: `{"type": .., "data": {..}}`.
    pub fn to_json(&self) -> Value {
        let response_type = match self.kind {
            ReplyKind::Message => 4,
            ReplyKind::Update => 7,
        };

        let components: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let buttons: Vec<Value> = row
                    .iter()
                    .map(|button| {
                        json!({
                            "type": 2,
                            "style": button.kind.code(),
                            "label": button.label,
                            "custom_id": button.custom_id,
                        })
                    })
                    .collect();
                json!({ "type": 1, "components": buttons })
            })
            .collect();

        let mut data = json!({
            "content": self.content,
            "components": components,
        });
        if self.ephemeral {
            data["flags"] = json!(EPHEMERAL_FLAG);
        }

        json!({ "type": response_type, "data": data })
    }
}

/// Splits buttons into action rows, never producing an empty row.
pub fn chunk_rows(buttons: Vec<MenuButton>) -> Vec<Vec<MenuButton>> {
    buttons
        .chunks(MAX_BUTTONS_PER_ROW)
        .map(|chunk| chunk.to_vec())
        .collect()
}
