/// Commands processed by the app's single command funnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,

    /// Present the opt-in dialog (from the trigger gate or a keybinding).
    ShowDialog,
    /// Dismiss the opt-in dialog.
    HideDialog,
}
