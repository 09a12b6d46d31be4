use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notification {
    HabitCompleted {
        name: String,
        streak: u32,
        goal: u32,
    },
    AlreadyDoneToday {
        name: String,
    },
    CycleCompleted {
        name: String,
        cycles: u32,
        reward_multiplier: u32,
    },
    AchievementUnlocked {
        name: String,
        description: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HabitCompleted { name, streak, goal } => {
                write!(f, "{name}: streak {streak}/{goal}.")
            }
            Self::AlreadyDoneToday { name } => {
                write!(f, "{name} was already completed today.")
            }
            Self::CycleCompleted {
                name,
                cycles,
                reward_multiplier,
            } => {
                write!(f, "Cycle complete for {name} (cycles: {cycles}).")?;
                if *reward_multiplier > 1 {
                    write!(f, " Mega-habit bonus: x{reward_multiplier} reward!")?;
                }
                Ok(())
            }
            Self::AchievementUnlocked { name, description } => {
                write!(f, "Achievement unlocked: {name} ({description}).")
            }
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("* {notification}");
    }
}
