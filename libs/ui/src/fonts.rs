// Font definitions for the 250x122 landscape panel

// Screen titles in the header bar
pub use u8g2_fonts::fonts::u8g2_font_helvB08_tf as FONT_HEADER;

// Labels, list rows and button captions
pub use u8g2_fonts::fonts::u8g2_font_helvR08_tf as FONT_SMALL;

// Secondary text such as status messages
pub use u8g2_fonts::fonts::u8g2_font_helvR10_tf as FONT_MEDIUM;

// Life totals on compact (four to six player) cards
pub use u8g2_fonts::fonts::u8g2_font_helvB12_tf as FONT_LIFE_SMALL;

// Life totals on two and three player cards
pub use u8g2_fonts::fonts::u8g2_font_helvB18_tf as FONT_LIFE_LARGE;

// Launcher icons. Open Iconic "all" set, 16x16 glyphs
pub use u8g2_fonts::fonts::u8g2_font_open_iconic_all_2x_t as ICON_APPS;
