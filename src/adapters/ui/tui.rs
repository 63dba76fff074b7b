//! Implements InputPort and PromptPort. Inquire-based interactive prompts.

use crate::adapters::output::{self, OutputFormat};
use crate::adapters::ui::progress;
use crate::domain::{Chat, ChatType, DomainError};
use crate::ports::{InputPort, PromptPort, TgGateway};
use crate::usecases::AnalyzerService;
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::sync::Arc;

const ENTER_MANUALLY: &str = "✎ Enter a username, link or id";

fn chat_type_indicator(kind: ChatType) -> &'static str {
    match kind {
        ChatType::Private => "[U]",
        ChatType::Group => "[G]",
        ChatType::Supergroup => "[S]",
        ChatType::Channel => "[C]",
    }
}

fn chat_option(chat: &Chat) -> String {
    format!("{} {} ({})", chat_type_indicator(chat.kind), chat.title, chat.id)
}

/// Identifier the analyzer accepts for a dialog: the public username when there is one.
fn chat_group_id(chat: &Chat) -> String {
    chat.username
        .as_ref()
        .map(|u| format!("@{}", u))
        .unwrap_or_else(|| chat.id.to_string())
}

/// Neon prompt theme for inquire.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightCyan))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightGreen));
    inquire::set_global_render_config(config);
}

fn prompt_err(e: inquire::InquireError) -> DomainError {
    DomainError::Prompt(e.to_string())
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    tg: Arc<dyn TgGateway>,
    analyzer: Arc<AnalyzerService>,
    format: OutputFormat,
}

impl TuiInputPort {
    pub fn new(tg: Arc<dyn TgGateway>, analyzer: Arc<AnalyzerService>, format: OutputFormat) -> Self {
        Self {
            tg,
            analyzer,
            format,
        }
    }

    /// Let the user pick one of their groups, or type an identifier.
    async fn pick_group(&self) -> Result<String, DomainError> {
        let groups: Vec<Chat> = self
            .tg
            .get_dialogs()
            .await?
            .into_iter()
            .filter(|c| c.kind.is_group())
            .collect();

        let mut options = vec![ENTER_MANUALLY.to_string()];
        options.extend(groups.iter().map(chat_option));

        let selected = Select::new("Select a group to analyze", options)
            .with_page_size(15)
            .prompt()
            .map_err(prompt_err)?;

        if selected == ENTER_MANUALLY {
            return Text::new("Group (@username, t.me link or numeric id):")
                .prompt()
                .map_err(prompt_err);
        }

        groups
            .iter()
            .find(|c| chat_option(c) == selected)
            .map(chat_group_id)
            .ok_or_else(|| DomainError::Prompt(format!("unknown selection: {}", selected)))
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self, preset: Option<String>) -> Result<(), DomainError> {
        let group = match preset {
            Some(g) => g,
            None => self.pick_group().await?,
        };

        let heading = format!(
            "Analyzing {} (last {} days)",
            group.trim(),
            self.analyzer.window_days()
        );
        let pb = progress::spinner(format!("{}...", heading));
        let on_page = |total: usize| pb.set_message(format!("{}: {} messages", heading, total));
        let result = self.analyzer.analyze_group(&group, Some(&on_page)).await;
        pb.finish_and_clear();

        let rendered = output::render(&result?, self.format)?;
        println!("{}", rendered);
        Ok(())
    }
}

/// Credential prompts for the login flow.
pub struct TuiPrompt;

#[async_trait]
impl PromptPort for TuiPrompt {
    async fn phone_number(&self) -> Result<String, DomainError> {
        Text::new("Phone number (international format):")
            .prompt()
            .map_err(prompt_err)
    }

    async fn login_code(&self) -> Result<String, DomainError> {
        Text::new("Login code from Telegram:")
            .prompt()
            .map_err(prompt_err)
    }

    async fn password(&self, hint: Option<&str>) -> Result<String, DomainError> {
        let mut prompt = Password::new("2FA password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation();
        if let Some(hint) = hint {
            prompt = prompt.with_help_message(hint);
        }
        prompt.prompt().map_err(prompt_err)
    }
}
