//! Conversions between wire DTOs and domain models.

use crate::domain::{ChatMode, Interests};

use super::websocket::ChatModeDto;

impl From<ChatModeDto> for ChatMode {
    fn from(dto: ChatModeDto) -> Self {
        match dto {
            ChatModeDto::Text => ChatMode::Text,
            ChatModeDto::Video => ChatMode::Video,
        }
    }
}

impl From<ChatMode> for ChatModeDto {
    fn from(mode: ChatMode) -> Self {
        match mode {
            ChatMode::Text => ChatModeDto::Text,
            ChatMode::Video => ChatModeDto::Video,
        }
    }
}

/// Build a domain interest set from raw wire tokens.
pub fn interests_from_wire(tokens: Vec<String>) -> Interests {
    Interests::new(tokens)
}
