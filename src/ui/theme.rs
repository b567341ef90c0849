use ratatui::style::Color;

/// Colours used by the trace viewer panes
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    /// Brackets, scope titles and the step counter
    pub accent: Color,
    /// Line number of the statement about to run
    pub current_line: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub keyword: Color,
    pub type_name: Color,
    pub function: Color,
    pub number: Color,
    /// Names owned by the scope they are listed under
    pub declared: Color,
    pub border_focused: Color,
    pub border_normal: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    text: Color::Rgb(205, 214, 244),
    muted: Color::Rgb(108, 112, 134),
    accent: Color::Rgb(137, 180, 250),
    current_line: Color::Rgb(250, 179, 135),
    highlight_bg: Color::Rgb(50, 50, 70),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(203, 166, 247),
    type_name: Color::Rgb(148, 226, 213),
    function: Color::Rgb(249, 226, 175),
    number: Color::Rgb(250, 179, 135),
    declared: Color::Rgb(245, 194, 231),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
};
