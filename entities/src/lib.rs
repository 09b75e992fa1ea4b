pub mod lesson_progress;

pub use lesson_progress::Entity as LessonProgress;
