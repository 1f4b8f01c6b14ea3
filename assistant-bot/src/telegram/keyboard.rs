use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::MenuItem;

/// One button per row, callback data = [`MenuItem::callback_data`].
pub fn menu_keyboard(items: &[MenuItem]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        items
            .iter()
            .map(|item| vec![InlineKeyboardButton::callback(item.label(), item.callback_data())]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keyboard_one_button_per_row() {
        let markup = menu_keyboard(&MenuItem::ALL);
        assert_eq!(markup.inline_keyboard.len(), 4);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(markup.inline_keyboard[2][0].text, "Diary");
    }
}
