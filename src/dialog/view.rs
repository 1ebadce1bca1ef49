use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Theme;
use crate::dialog::{DialogOptions, PromptAction};

const DIALOG_WIDTH: u16 = 64;
const BUTTON_GAP: u16 = 2;

/// One entry of the button dispatch table: a pure description of a
/// click target, consumed by the generic action handler.
#[derive(Debug, Clone)]
pub struct ButtonNode {
    pub action: PromptAction,
    pub label: String,
    pub background: Option<ratatui::style::Color>,
    pub text: Option<ratatui::style::Color>,
}

/// The dialog's visual tree: container → icon + text block → button
/// row → optional attribution → close affordance.
#[derive(Debug, Clone)]
pub struct DialogTree {
    pub icon: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    /// Negative first, positive second, matching the on-screen order.
    pub buttons: [ButtonNode; 2],
    pub attribution: Option<String>,
}

impl DialogTree {
    pub fn build(options: &DialogOptions) -> Self {
        Self {
            icon: options.icon.clone(),
            title: (!options.title.is_empty()).then(|| options.title.clone()),
            message: (!options.message.is_empty()).then(|| options.message.clone()),
            buttons: [
                ButtonNode {
                    action: PromptAction::Negative,
                    label: options.negative_label.clone(),
                    background: options.negative_background,
                    text: options.negative_text,
                },
                ButtonNode {
                    action: PromptAction::Positive,
                    label: options.positive_label.clone(),
                    background: options.positive_background,
                    text: options.positive_text,
                },
            ],
            attribution: options.attribution.clone(),
        }
    }
}

/// Screen regions that accept clicks, recorded at render time.
#[derive(Debug, Clone, Copy, Default)]
struct HitBoxes {
    container: Rect,
    negative: Rect,
    positive: Rect,
    close: Rect,
}

/// A mounted dialog: the built tree plus its current hit boxes.
#[derive(Debug, Clone)]
pub struct MountedDialog {
    pub tree: DialogTree,
    hit: HitBoxes,
}

impl MountedDialog {
    pub fn new(tree: DialogTree) -> Self {
        Self {
            tree,
            hit: HitBoxes::default(),
        }
    }

    /// Map a click position to its target, if any.
    pub fn hit_action(&self, x: u16, y: u16) -> Option<PromptAction> {
        let position = Position::new(x, y);
        if self.hit.close.contains(position) {
            Some(PromptAction::Close)
        } else if self.hit.positive.contains(position) {
            Some(PromptAction::Positive)
        } else if self.hit.negative.contains(position) {
            Some(PromptAction::Negative)
        } else {
            None
        }
    }

    /// Whether the position falls inside the dialog container.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.hit.container.contains(Position::new(x, y))
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, options: &DialogOptions, theme: &Theme) {
        let tree = &self.tree;
        let mut rows: Vec<Constraint> = Vec::new();
        if tree.title.is_some() {
            rows.push(Constraint::Length(1));
        }
        if tree.message.is_some() {
            rows.push(Constraint::Length(1));
        }
        rows.push(Constraint::Fill(1));
        rows.push(Constraint::Length(1));

        let height = rows.len() as u16 + 3;
        let width = DIALOG_WIDTH.min(area.width.saturating_sub(2));
        let popup = area.centered(Constraint::Length(width), Constraint::Length(height));
        self.hit.container = popup;

        frame.render_widget(Clear, popup);

        let background = options.container_background().unwrap_or(theme.base);
        let foreground = options.container_text().unwrap_or(theme.text);
        let border = options.container_border().unwrap_or(theme.border_focused());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(background).fg(foreground));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::vertical(rows).split(inner);
        let mut row = 0;

        if let Some(title) = &tree.title {
            let mut spans = Vec::new();
            if let Some(icon) = &tree.icon {
                spans.push(Span::raw(format!("{icon} ")));
            }
            spans.push(Span::styled(
                title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(Paragraph::new(Line::from(spans)), layout[row]);
            row += 1;
        }

        if let Some(message) = &tree.message {
            let indent = if tree.title.is_some() && tree.icon.is_some() {
                "   "
            } else {
                ""
            };
            frame.render_widget(
                Paragraph::new(format!("{indent}{message}"))
                    .style(Style::default().fg(options.container_text().unwrap_or(theme.subtext0))),
                layout[row],
            );
            row += 1;
        }

        self.render_footer(frame, layout[row + 1], theme);
        self.render_close(frame, popup, theme);
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [negative, positive] = &self.tree.buttons;
        let negative_width = button_width(&negative.label);
        let positive_width = button_width(&positive.label);

        let columns = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(negative_width),
            Constraint::Length(BUTTON_GAP),
            Constraint::Length(positive_width),
        ])
        .split(area);

        if let Some(attribution) = &self.tree.attribution {
            frame.render_widget(
                Paragraph::new(attribution.clone())
                    .style(Style::default().fg(theme.overlay1).add_modifier(Modifier::ITALIC)),
                columns[0],
            );
        }

        render_button(frame, columns[1], negative, theme.surface0, theme.subtext0);
        render_button(frame, columns[3], positive, theme.accent(), theme.base);

        self.hit.negative = columns[1];
        self.hit.positive = columns[3];
    }

    fn render_close(&mut self, frame: &mut Frame, popup: Rect, theme: &Theme) {
        if popup.width < 4 {
            return;
        }
        let close = Rect::new(popup.x + popup.width - 4, popup.y, 3, 1);
        frame.render_widget(
            Paragraph::new(" ✕ ").style(Style::default().fg(theme.overlay1)),
            close,
        );
        self.hit.close = close;
    }
}

fn button_width(label: &str) -> u16 {
    label.chars().count() as u16 + 2
}

fn render_button(
    frame: &mut Frame,
    area: Rect,
    button: &ButtonNode,
    fallback_bg: ratatui::style::Color,
    fallback_fg: ratatui::style::Color,
) {
    let style = Style::default()
        .bg(button.background.unwrap_or(fallback_bg))
        .fg(button.text.unwrap_or(fallback_fg))
        .add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new(format!(" {} ", button.label))
            .style(style)
            .alignment(Alignment::Center),
        area,
    );
}
