use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::command::Command;
use crate::config::{AppConfig, GlobalAction};
use crate::dialog::{DialogOptions, OptinDialog, TriggerGate};
use crate::host::{HostServices, SubscriptionState};
use crate::host::sim::{Simulator, SnoozeSnapshot};
use crate::tui::{Event, Tui};

/// The demo host: a stand-in for the site that embeds the opt-in
/// dialog. It owns the event loop, routes input to the dialog while it
/// is presented, and re-arms the trigger gate after a dismissal so the
/// host-side re-evaluation contract is visible end to end.
pub struct App {
    config: Arc<AppConfig>,
    theme: Theme,
    dialog: OptinDialog,
    gate: TriggerGate,
    sim: Simulator,
    command_tx: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
    should_quit: bool,
    should_suspend: bool,
    started_at: Instant,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        theme: Theme,
        options: DialogOptions,
        hosts: &HostServices,
        sim: Simulator,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let dialog = OptinDialog::new(options, hosts, config.keybindings.prompt.clone());
        let gate = TriggerGate::new(Arc::clone(&hosts.triggers), command_tx.clone());
        Self {
            config,
            theme,
            dialog,
            gate,
            sim,
            command_tx,
            command_rx,
            should_quit: false,
            should_suspend: false,
            started_at: Instant::now(),
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(60.0, 4.0)?;
        tui.enter()?;

        self.gate.arm(self.dialog.options().triggers.clone());
        info!("armed opt-in trigger gate");

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_commands(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.command_tx.send(Command::Resume)?;
                self.command_tx.send(Command::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.command_tx.send(Command::Quit)?,
            Event::Tick => self.command_tx.send(Command::Tick)?,
            Event::Render => self.command_tx.send(Command::Render)?,
            Event::Resize(width, height) => self.command_tx.send(Command::Resize(width, height))?,
            Event::Key(key) => self.handle_key_event(&key)?,
            Event::Mouse(mouse) => {
                let was_presenting = self.dialog.is_presenting();
                if self.dialog.handle_mouse(&mouse) {
                    self.maybe_rearm(was_presenting);
                }
            }
            Event::Error(message) => error!(%message, "terminal event error"),
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> color_eyre::Result<()> {
        let was_presenting = self.dialog.is_presenting();
        if self.dialog.handle_key(key) {
            self.maybe_rearm(was_presenting);
            return Ok(());
        }

        let keybindings = &self.config.keybindings;
        let command = if keybindings.matches_global(key, GlobalAction::Quit) {
            Command::Quit
        } else if keybindings.matches_global(key, GlobalAction::Suspend) {
            Command::Suspend
        } else if keybindings.matches_global(key, GlobalAction::ShowDialog) {
            Command::ShowDialog
        } else {
            return Ok(());
        };
        self.command_tx.send(command)?;
        Ok(())
    }

    fn handle_commands(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        while let Ok(command) = self.command_rx.try_recv() {
            if command != Command::Tick && command != Command::Render {
                debug!("Handling command: {:?}", command);
            }

            match command {
                Command::Tick => {}
                Command::Quit => self.should_quit = true,
                Command::Suspend => self.should_suspend = true,
                Command::Resume => self.should_suspend = false,
                Command::ClearScreen => tui.clear()?,
                Command::Resize(width, height) => {
                    tui.resize(width, height)?;
                    self.render(tui)?;
                }
                Command::Render => self.render(tui)?,
                Command::ShowDialog => self.dialog.show(),
                Command::HideDialog => {
                    let was_presenting = self.dialog.is_presenting();
                    self.dialog.hide_dialog();
                    self.maybe_rearm(was_presenting);
                }
            }
        }
        Ok(())
    }

    /// After a dismissal, hand the cycle back to the trigger service —
    /// unless there is no point: the user opted out for good, or the
    /// state became one the dialog would refuse to show in anyway.
    fn maybe_rearm(&mut self, was_presenting: bool) {
        if !was_presenting || self.dialog.is_presenting() {
            return;
        }
        if matches!(self.sim.snooze_snapshot(), SnoozeSnapshot::Forever) {
            debug!("dialog snoozed forever, not re-arming");
            return;
        }
        if matches!(
            self.sim.subscription_state(),
            SubscriptionState::Subscribed | SubscriptionState::Denied | SubscriptionState::Unsupported
        ) {
            return;
        }
        self.gate.arm(self.dialog.options().triggers.clone());
        info!("re-armed opt-in trigger gate");
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let theme = self.theme;
        tui.draw(|frame| {
            let area = frame.area();
            self.render_page(frame, area, &theme);
            self.dialog.render(frame, area, &theme);
        })?;
        Ok(())
    }

    fn render_page(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme.base)),
            area,
        );

        let [header, body, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    " optin-prompt ",
                    Style::default()
                        .fg(theme.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("— opt-in dialog demo", Style::default().fg(theme.overlay1)),
            ])),
            header,
        );

        let seconds_on_page = self.started_at.elapsed().as_secs();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  This page stands in for a site embedding the opt-in dialog.",
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                "  Once the trigger condition is met, the dialog asks to enable",
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                "  push notifications. Dismissing it snoozes the next prompt.",
                Style::default().fg(theme.text),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("  Time on page: {seconds_on_page}s"),
                Style::default().fg(theme.subtext0),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), body);

        self.render_status_bar(frame, status, theme);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let state = self.sim.subscription_state();
        let state_color = match state {
            SubscriptionState::Subscribed => theme.success(),
            SubscriptionState::Denied => theme.error(),
            SubscriptionState::Unsupported => theme.warning(),
            SubscriptionState::Other => theme.subtext0,
        };

        let snooze = match self.sim.snooze_snapshot() {
            SnoozeSnapshot::None => "none".to_string(),
            SnoozeSnapshot::Until(at) => format!("until {}", at.format("%H:%M:%S")),
            SnoozeSnapshot::Forever => "never again".to_string(),
        };

        let show_key = self.config.keybindings.global.show_dialog.display();
        let quit_key = self.config.keybindings.global.quit.display();

        let line = Line::from(vec![
            Span::styled(" push: ", Style::default().fg(theme.overlay1)),
            Span::styled(state.to_string(), Style::default().fg(state_color)),
            Span::styled("  snooze: ", Style::default().fg(theme.overlay1)),
            Span::styled(snooze, Style::default().fg(theme.subtext0)),
            Span::styled(
                format!("  {show_key} show · {quit_key} quit"),
                Style::default().fg(theme.overlay1),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme.surface0)),
            area,
        );
    }
}
