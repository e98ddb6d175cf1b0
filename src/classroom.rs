use std::fmt::Display;

use clap::ValueEnum;

/// School level; shapes the tone of the congratulatory message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Level {
    #[default]
    Elementary,
    Middle,
    High,
}

impl Level {
    /// Name shown to teachers.
    pub fn title(self) -> &'static str {
        match self {
            Level::Elementary => "Tiểu học",
            Level::Middle => "THCS",
            Level::High => "THPT",
        }
    }

    /// Writing style asked of the text generator.
    pub fn voice(self) -> &'static str {
        match self {
            Level::Elementary => {
                "Dùng ngôn ngữ đáng yêu, nhân hóa các đồ vật, khen ngợi như một người bạn thân."
            }
            Level::Middle => {
                "Dùng ngôn ngữ 'teen', hài hước, bắt trend, phong cách siêu anh hùng hoặc game thủ."
            }
            Level::High => {
                "Dùng ngôn ngữ thông minh, dí dỏm, mang tính khích lệ tư duy và cá tính."
            }
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

pub const SUBJECTS: [&str; 8] = [
    "Toán học",
    "Ngữ văn",
    "Tiếng Anh",
    "Khoa học",
    "Lịch sử",
    "Địa lý",
    "Tin học",
    "Nghệ thuật",
];

pub fn default_subject() -> &'static str {
    SUBJECTS[0]
}
