use chrono::{DateTime, Duration, Months, Utc};

use crate::achievements::Achievement;
use crate::goals::Goal;
use crate::habits::{Habit, HabitProgress};
use crate::ids::IdGenerator;
use crate::model::{
    AchievementCategory, AchievementKind, Benefit, Difficulty, GoalInput, HabitCategory, Level,
};
use crate::profile::BadHabit;

pub const FIRST_STEP_ID: &str = "first-step";

pub struct HabitTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: HabitCategory,
    pub goal: u32,
    pub level: Level,
    pub difficulty: Difficulty,
    pub mega: bool,
    pub benefits: &'static [Benefit],
}

impl HabitTemplate {
    pub fn build(&self, now: DateTime<Utc>) -> Habit {
        Habit {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            category: self.category,
            goal: self.goal,
            progress: HabitProgress::NotStarted,
            last_completed: None,
            is_mega_habit: self.mega,
            required_level: Some(self.level),
            benefits: self.benefits.iter().copied().collect(),
            difficulty: Some(self.difficulty),
            created_at: now,
        }
    }
}

pub const STARTER_HABITS: &[HabitTemplate] = &[
    HabitTemplate {
        id: "drink-water",
        name: "Beber 2 litros de agua",
        description: "Mantente hidratado durante todo el día.",
        category: HabitCategory::Health,
        goal: 21,
        level: Level::Principiante,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Health, Benefit::Energy],
    },
    HabitTemplate {
        id: "daily-walk",
        name: "Caminar 30 minutos",
        description: "Sal a caminar a paso ligero.",
        category: HabitCategory::Fitness,
        goal: 21,
        level: Level::Principiante,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Health, Benefit::Calm],
    },
    HabitTemplate {
        id: "sleep-8h",
        name: "Dormir 8 horas",
        description: "Acuéstate a la misma hora todas las noches.",
        category: HabitCategory::Health,
        goal: 21,
        level: Level::Principiante,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Energy, Benefit::Focus],
    },
    HabitTemplate {
        id: "read-10-pages",
        name: "Leer 10 páginas",
        description: "Lee un libro de no ficción cada día.",
        category: HabitCategory::Mind,
        goal: 21,
        level: Level::Principiante,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Focus],
    },
    HabitTemplate {
        id: "meditate",
        name: "Meditar 10 minutos",
        description: "Respiración consciente por la mañana.",
        category: HabitCategory::Mind,
        goal: 21,
        level: Level::Aprendiz,
        difficulty: Difficulty::Medium,
        mega: false,
        benefits: &[Benefit::Calm, Benefit::Focus],
    },
    HabitTemplate {
        id: "strength-training",
        name: "Entrenamiento de fuerza",
        description: "Tres series de ejercicios con peso corporal.",
        category: HabitCategory::Fitness,
        goal: 30,
        level: Level::Aprendiz,
        difficulty: Difficulty::Medium,
        mega: false,
        benefits: &[Benefit::Health, Benefit::Confidence],
    },
    HabitTemplate {
        id: "track-expenses",
        name: "Registrar gastos",
        description: "Anota cada gasto del día.",
        category: HabitCategory::Finance,
        goal: 30,
        level: Level::Aprendiz,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Wealth, Benefit::Discipline],
    },
    HabitTemplate {
        id: "talk-to-stranger",
        name: "Hablar con un desconocido",
        description: "Inicia una conversación breve con alguien nuevo.",
        category: HabitCategory::Social,
        goal: 10,
        level: Level::Aprendiz,
        difficulty: Difficulty::Medium,
        mega: false,
        benefits: &[Benefit::Social, Benefit::Confidence],
    },
    HabitTemplate {
        id: "cold-shower",
        name: "Ducha fría",
        description: "Termina la ducha con dos minutos de agua fría.",
        category: HabitCategory::Discipline,
        goal: 21,
        level: Level::Dedicado,
        difficulty: Difficulty::Hard,
        mega: true,
        benefits: &[Benefit::Discipline, Benefit::Energy],
    },
    HabitTemplate {
        id: "wake-up-early",
        name: "Levantarse a las 6:00",
        description: "Empieza el día antes que los demás.",
        category: HabitCategory::Productivity,
        goal: 21,
        level: Level::Dedicado,
        difficulty: Difficulty::Hard,
        mega: false,
        benefits: &[Benefit::Discipline, Benefit::Focus],
    },
    HabitTemplate {
        id: "deep-work",
        name: "Trabajo profundo 2 horas",
        description: "Bloque sin distracciones dedicado a tu tarea principal.",
        category: HabitCategory::Productivity,
        goal: 21,
        level: Level::Dedicado,
        difficulty: Difficulty::Medium,
        mega: false,
        benefits: &[Benefit::Focus, Benefit::Wealth],
    },
    HabitTemplate {
        id: "save-10-percent",
        name: "Ahorrar el 10% de los ingresos",
        description: "Aparta una parte de cada ingreso antes de gastar.",
        category: HabitCategory::Finance,
        goal: 30,
        level: Level::Dedicado,
        difficulty: Difficulty::Medium,
        mega: false,
        benefits: &[Benefit::Wealth],
    },
    HabitTemplate {
        id: "intermittent-fasting",
        name: "Ayuno 16:8",
        description: "Come solo dentro de una ventana de ocho horas.",
        category: HabitCategory::Health,
        goal: 30,
        level: Level::Experto,
        difficulty: Difficulty::Hard,
        mega: true,
        benefits: &[Benefit::Health, Benefit::Discipline],
    },
    HabitTemplate {
        id: "public-speaking",
        name: "Practicar oratoria",
        description: "Graba o presenta un discurso de cinco minutos.",
        category: HabitCategory::Social,
        goal: 21,
        level: Level::Experto,
        difficulty: Difficulty::Hard,
        mega: false,
        benefits: &[Benefit::Confidence, Benefit::Social],
    },
    HabitTemplate {
        id: "gratitude-journal",
        name: "Diario de gratitud",
        description: "Escribe tres cosas por las que estás agradecido.",
        category: HabitCategory::Mind,
        goal: 21,
        level: Level::Experto,
        difficulty: Difficulty::Easy,
        mega: false,
        benefits: &[Benefit::Calm],
    },
    HabitTemplate {
        id: "hiit",
        name: "Entrenamiento HIIT",
        description: "Veinte minutos de intervalos de alta intensidad.",
        category: HabitCategory::Fitness,
        goal: 30,
        level: Level::Maestro,
        difficulty: Difficulty::Extreme,
        mega: true,
        benefits: &[Benefit::Health, Benefit::Energy],
    },
    HabitTemplate {
        id: "screen-free-day",
        name: "Día sin pantallas",
        description: "Un día completo sin pantallas fuera del trabajo.",
        category: HabitCategory::Discipline,
        goal: 14,
        level: Level::Maestro,
        difficulty: Difficulty::Extreme,
        mega: true,
        benefits: &[Benefit::Discipline, Benefit::Calm],
    },
    HabitTemplate {
        id: "invest",
        name: "Invertir cada semana",
        description: "Dedica tiempo a revisar y aumentar tus inversiones.",
        category: HabitCategory::Finance,
        goal: 30,
        level: Level::Maestro,
        difficulty: Difficulty::Hard,
        mega: false,
        benefits: &[Benefit::Wealth],
    },
];

const NO_PORN: HabitTemplate = abstinence(
    "no-porn",
    "Sin pornografía",
    "Recupera tu energía y tu enfoque.",
    21,
    true,
);

const NO_PORN_STARTER: HabitTemplate = abstinence(
    "no-porn-5-days",
    "Cinco días limpio",
    "Primer objetivo corto sin pornografía.",
    5,
    false,
);

const NO_SMOKING: HabitTemplate = abstinence(
    "no-smoking",
    "Sin fumar",
    "Cada día sin tabaco cuenta.",
    21,
    false,
);

const NO_ALCOHOL: HabitTemplate = abstinence(
    "no-alcohol",
    "Sin alcohol",
    "Mantente sobrio un día más.",
    30,
    false,
);

const NO_SOCIAL_MEDIA: HabitTemplate = abstinence(
    "no-social-media",
    "Sin redes sociales",
    "Cero desplazamiento infinito hoy.",
    14,
    false,
);

const NO_PROCRASTINATION: HabitTemplate = abstinence(
    "no-procrastination",
    "Tarea difícil primero",
    "Haz lo más importante antes que nada.",
    21,
    false,
);

const NO_JUNK_FOOD: HabitTemplate = abstinence(
    "no-junk-food",
    "Sin comida basura",
    "Elige comida real en cada comida.",
    21,
    false,
);

const NO_GAMBLING: HabitTemplate = abstinence(
    "no-gambling",
    "Sin apuestas",
    "Ni una apuesta hoy.",
    30,
    false,
);

const NO_VIDEO_GAMES: HabitTemplate = abstinence(
    "no-video-games",
    "Sin videojuegos",
    "Usa ese tiempo en algo que te haga crecer.",
    14,
    false,
);

const fn abstinence(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    goal: u32,
    mega: bool,
) -> HabitTemplate {
    HabitTemplate {
        id,
        name,
        description,
        category: HabitCategory::Discipline,
        goal,
        level: Level::Principiante,
        difficulty: if mega {
            Difficulty::Extreme
        } else {
            Difficulty::Hard
        },
        mega,
        benefits: &[Benefit::Discipline],
    }
}

pub fn habits_for_bad_habit(habit: BadHabit) -> &'static [HabitTemplate] {
    match habit {
        BadHabit::None => &[],
        BadHabit::Pornography => &[NO_PORN, NO_PORN_STARTER],
        BadHabit::Smoking => &[NO_SMOKING],
        BadHabit::Alcohol => &[NO_ALCOHOL],
        BadHabit::SocialMedia => &[NO_SOCIAL_MEDIA],
        BadHabit::Procrastination => &[NO_PROCRASTINATION],
        BadHabit::JunkFood => &[NO_JUNK_FOOD],
        BadHabit::Gambling => &[NO_GAMBLING],
        BadHabit::VideoGames => &[NO_VIDEO_GAMES],
    }
}

pub struct AchievementTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub kind: AchievementKind,
    pub requirement: u32,
}

impl AchievementTemplate {
    pub fn build(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            kind: self.kind,
            requirement: self.requirement,
            unlocked_at: None,
        }
    }
}

pub const ACHIEVEMENTS: &[AchievementTemplate] = &[
    AchievementTemplate {
        id: FIRST_STEP_ID,
        name: "Primer Paso",
        description: "Completa un hábito por primera vez",
        category: AchievementCategory::Overall,
        kind: AchievementKind::Streak,
        requirement: 1,
    },
    AchievementTemplate {
        id: "perfect-week",
        name: "Semana Perfecta",
        description: "Alcanza una racha de 7 días",
        category: AchievementCategory::Overall,
        kind: AchievementKind::Streak,
        requirement: 7,
    },
    AchievementTemplate {
        id: "habit-formed",
        name: "Hábito Formado",
        description: "Alcanza una racha de 21 días",
        category: AchievementCategory::Overall,
        kind: AchievementKind::Streak,
        requirement: 21,
    },
    AchievementTemplate {
        id: "athlete",
        name: "Atleta",
        description: "Racha de 30 días en un hábito de fitness",
        category: AchievementCategory::Fitness,
        kind: AchievementKind::Streak,
        requirement: 30,
    },
    AchievementTemplate {
        id: "clear-mind",
        name: "Mente Clara",
        description: "Racha de 14 días en un hábito mental",
        category: AchievementCategory::Mind,
        kind: AchievementKind::Streak,
        requirement: 14,
    },
    AchievementTemplate {
        id: "social-butterfly",
        name: "Mariposa Social",
        description: "Racha de 10 días en un hábito social",
        category: AchievementCategory::Social,
        kind: AchievementKind::Streak,
        requirement: 10,
    },
    AchievementTemplate {
        id: "saver",
        name: "Ahorrador",
        description: "Racha de 30 días en un hábito financiero",
        category: AchievementCategory::Finance,
        kind: AchievementKind::Streak,
        requirement: 30,
    },
    AchievementTemplate {
        id: "productive",
        name: "Imparable",
        description: "Racha de 21 días en un hábito de productividad",
        category: AchievementCategory::Productivity,
        kind: AchievementKind::Streak,
        requirement: 21,
    },
    AchievementTemplate {
        id: "self-control",
        name: "Autocontrol",
        description: "Racha de 30 días en un hábito de disciplina",
        category: AchievementCategory::Discipline,
        kind: AchievementKind::Streak,
        requirement: 30,
    },
    AchievementTemplate {
        id: "mega-evolution",
        name: "Megaevolución",
        description: "Completa el ciclo de 3 mega-hábitos",
        category: AchievementCategory::Discipline,
        kind: AchievementKind::MegaHabitCycles,
        requirement: 3,
    },
];

#[derive(Clone, Copy)]
pub enum DeadlineOffset {
    Months(u32),
    Days(i64),
}

impl DeadlineOffset {
    fn after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Months(months) => now.checked_add_months(Months::new(*months)),
            Self::Days(days) => now.checked_add_signed(Duration::days(*days)),
        }
    }
}

pub struct GoalTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub category: HabitCategory,
    pub deadline: DeadlineOffset,
    pub steps: &'static [&'static str],
}

impl GoalTemplate {
    pub fn build(&self, ids: &dyn IdGenerator, now: DateTime<Utc>) -> Goal {
        let input = GoalInput {
            title: self.title.to_string(),
            description: Some(self.description.to_string()),
            category: self.category,
            deadline: self.deadline.after(now),
            steps: self.steps.iter().map(|step| step.to_string()).collect(),
        };
        Goal::new(ids.next_id(), input, ids, now)
    }
}

pub const STARTER_GOALS: &[GoalTemplate] = &[
    GoalTemplate {
        title: "Ponerse en forma",
        description: "Construye una base física sólida en tres meses.",
        category: HabitCategory::Fitness,
        deadline: DeadlineOffset::Months(3),
        steps: &[
            "Entrenar tres veces por semana",
            "Caminar 10.000 pasos al día",
            "Reducir el azúcar",
            "Completar un reto de 30 días",
        ],
    },
    GoalTemplate {
        title: "Fondo de emergencia",
        description: "Ahorra el equivalente a un mes de gastos.",
        category: HabitCategory::Finance,
        deadline: DeadlineOffset::Months(2),
        steps: &[
            "Calcular los gastos mensuales",
            "Abrir una cuenta de ahorro aparte",
            "Automatizar una transferencia semanal",
        ],
    },
    GoalTemplate {
        title: "Leer un libro completo",
        description: "Termina un libro de desarrollo personal este mes.",
        category: HabitCategory::Mind,
        deadline: DeadlineOffset::Days(30),
        steps: &[
            "Elegir el libro",
            "Leer la primera mitad",
            "Leer la segunda mitad",
            "Escribir un resumen",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn habit_catalog_covers_every_level() {
        for level in [
            Level::Principiante,
            Level::Aprendiz,
            Level::Dedicado,
            Level::Experto,
            Level::Maestro,
        ] {
            assert!(
                STARTER_HABITS.iter().any(|habit| habit.level == level),
                "no habit for {level}"
            );
        }
        assert_eq!(STARTER_HABITS.len(), 18);
    }

    #[test]
    fn seeded_ids_are_unique() {
        let mut ids: HashSet<&str> = STARTER_HABITS.iter().map(|habit| habit.id).collect();
        for bad in [
            BadHabit::Pornography,
            BadHabit::Smoking,
            BadHabit::Alcohol,
            BadHabit::SocialMedia,
            BadHabit::Procrastination,
            BadHabit::JunkFood,
            BadHabit::Gambling,
            BadHabit::VideoGames,
        ] {
            for template in habits_for_bad_habit(bad) {
                assert!(ids.insert(template.id), "duplicate id {}", template.id);
            }
        }
        let achievement_ids: HashSet<&str> = ACHIEVEMENTS.iter().map(|item| item.id).collect();
        assert_eq!(achievement_ids.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn achievement_catalog_shape() {
        assert_eq!(ACHIEVEMENTS.len(), 10);
        let overall = ACHIEVEMENTS
            .iter()
            .filter(|item| item.category == AchievementCategory::Overall)
            .count();
        assert_eq!(overall, 3);
        let mega: Vec<_> = ACHIEVEMENTS
            .iter()
            .filter(|item| item.kind == AchievementKind::MegaHabitCycles)
            .collect();
        assert_eq!(mega.len(), 1);
        assert_eq!(mega[0].requirement, 3);
    }

    #[test]
    fn no_bad_habit_adds_nothing() {
        assert!(habits_for_bad_habit(BadHabit::None).is_empty());
    }

    #[test]
    fn deadline_offsets() {
        let now = Utc::now();
        let in_thirty = DeadlineOffset::Days(30).after(now).expect("days");
        assert_eq!(in_thirty - now, Duration::days(30));
        let in_two = DeadlineOffset::Months(2).after(now).expect("months");
        assert!(in_two > now + Duration::days(58));
    }
}
