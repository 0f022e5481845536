//! Default config file content.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# WTStation Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "WTStation"
# width = 1400
# height = 900
# min_width = 800
# min_height = 600
# decorations = false     # the UI draws its own title bar

[layout]
# title_bar_height = 40.0          # 0-200
# sidebar_expanded_width = 256.0   # 0-800
# sidebar_collapsed_width = 80.0   # 0-800
# sidebar_gap = 1.0                # 0-20

[surfaces]
# user_agent = "Mozilla/5.0 ... Chrome/120.0.0.0 Safari/537.36"
# devtools = false
# offscreen_x = -10000.0
# offscreen_y = -10000.0
# init_delay_ms = 500              # 0-10000
# whatsapp_url = "https://web.whatsapp.com"
# telegram_url = "https://web.telegram.org"

[consistency]
# check_interval_ms = 200          # 50-10000
# recheck_delay_ms = 100           # 10-5000

[logging]
# level = "info"                   # trace, debug, info, warn, error
"##
}
