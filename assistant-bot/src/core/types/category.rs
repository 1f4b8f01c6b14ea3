use std::fmt;

/// Topical category a user can ask questions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Programming,
    Database,
    Chat,
}

impl Category {
    /// Stable name stored in the `interactions.category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Database => "database",
            Category::Chat => "chat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One button of the main menu. Diary is a menu entry but not a question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    Programming,
    Database,
    Diary,
    Chat,
}

impl MenuItem {
    /// Menu order as shown to the user.
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Programming,
        MenuItem::Database,
        MenuItem::Diary,
        MenuItem::Chat,
    ];

    pub fn callback_data(&self) -> &'static str {
        match self {
            MenuItem::Programming => "programming",
            MenuItem::Database => "database",
            MenuItem::Diary => "diary",
            MenuItem::Chat => "chat",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|item| item.callback_data() == data.trim())
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Programming => "Programming",
            MenuItem::Database => "Database",
            MenuItem::Diary => "Diary",
            MenuItem::Chat => "Chat",
        }
    }

    /// The question category this entry opens, or `None` for the diary.
    pub fn category(&self) -> Option<Category> {
        match self {
            MenuItem::Programming => Some(Category::Programming),
            MenuItem::Database => Some(Category::Database),
            MenuItem::Chat => Some(Category::Chat),
            MenuItem::Diary => None,
        }
    }
}
