//! Control message layout

use serde::Deserialize;
use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateMessage};

/// Custom ID of the restart button
pub const RESTART_BUTTON_ID: &str = "restart_rcon";

/// Embed and button text of the control message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlPanel {
    /// Embed title
    #[serde(default = "default_title")]
    pub title: String,
    /// Embed description
    #[serde(default = "default_description")]
    pub description: String,
    /// Embed colour (0xRRGGBB)
    #[serde(default = "default_color")]
    pub color: u32,
    /// Restart button label
    #[serde(default = "default_button_label")]
    pub button_label: String,
}

fn default_title() -> String {
    "RCON Control".to_string()
}

fn default_description() -> String {
    "Restart the HLL RCON container".to_string()
}

fn default_color() -> u32 {
    0x00ff00
}

fn default_button_label() -> String {
    "Restart RCON".to_string()
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            color: default_color(),
            button_label: default_button_label(),
        }
    }
}

impl ControlPanel {
    /// Build the message: one embed and a single row holding the restart button
    pub fn to_message(&self) -> CreateMessage {
        let embed = CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.color);
        let button = CreateButton::new(RESTART_BUTTON_ID)
            .label(&self.button_label)
            .style(ButtonStyle::Primary);

        CreateMessage::new()
            .embed(embed)
            .components(vec![CreateActionRow::Buttons(vec![button])])
    }
}
