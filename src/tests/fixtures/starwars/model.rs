use std::collections::HashMap;

use crate::HostValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Episode {
    NewHope,
    Empire,
    Jedi,
}

impl Episode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewHope => "NEW_HOPE",
            Self::Empire => "EMPIRE",
            Self::Jedi => "JEDI",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NEW_HOPE" => Some(Self::NewHope),
            "EMPIRE" => Some(Self::Empire),
            "JEDI" => Some(Self::Jedi),
            _ => None,
        }
    }
}

pub trait Character {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn friend_ids(&self) -> &[String];
    fn appears_in(&self) -> &[Episode];
}

#[derive(Clone, Debug)]
pub struct Human {
    id: String,
    name: String,
    friend_ids: Vec<String>,
    appears_in: Vec<Episode>,
    home_planet: Option<String>,
}

impl Human {
    fn new(
        id: &str,
        name: &str,
        friend_ids: &[&str],
        appears_in: &[Episode],
        home_planet: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            friend_ids: friend_ids.iter().copied().map(Into::into).collect(),
            appears_in: appears_in.to_vec(),
            home_planet: home_planet.map(Into::into),
        }
    }

    pub fn home_planet(&self) -> Option<&str> {
        self.home_planet.as_deref()
    }
}

impl Character for Human {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn friend_ids(&self) -> &[String] {
        &self.friend_ids
    }

    fn appears_in(&self) -> &[Episode] {
        &self.appears_in
    }
}

#[derive(Clone, Debug)]
pub struct Droid {
    id: String,
    name: String,
    friend_ids: Vec<String>,
    appears_in: Vec<Episode>,
    primary_function: Option<String>,
}

impl Droid {
    fn new(
        id: &str,
        name: &str,
        friend_ids: &[&str],
        appears_in: &[Episode],
        primary_function: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            friend_ids: friend_ids.iter().copied().map(Into::into).collect(),
            appears_in: appears_in.to_vec(),
            primary_function: primary_function.map(Into::into),
        }
    }

    pub fn primary_function(&self) -> Option<&str> {
        self.primary_function.as_deref()
    }
}

impl Character for Droid {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn friend_ids(&self) -> &[String] {
        &self.friend_ids
    }

    fn appears_in(&self) -> &[Episode] {
        &self.appears_in
    }
}

#[derive(Debug, Default)]
pub struct Database {
    humans: HashMap<String, Human>,
    droids: HashMap<String, Droid>,
}

impl Database {
    pub fn new() -> Self {
        use Episode::{Empire, Jedi, NewHope};

        let humans = [
            Human::new(
                "1000",
                "Luke Skywalker",
                &["1002", "1003", "2000", "2001"],
                &[NewHope, Empire, Jedi],
                Some("Tatooine"),
            ),
            Human::new(
                "1001",
                "Darth Vader",
                &["1004"],
                &[NewHope, Empire, Jedi],
                Some("Tatooine"),
            ),
            Human::new(
                "1002",
                "Han Solo",
                &["1000", "1003", "2001"],
                &[NewHope, Empire, Jedi],
                None,
            ),
            Human::new(
                "1003",
                "Leia Organa",
                &["1000", "1002", "2000", "2001"],
                &[NewHope, Empire, Jedi],
                Some("Alderaan"),
            ),
            Human::new("1004", "Wilhuff Tarkin", &["1001"], &[NewHope], None),
        ];
        let droids = [
            Droid::new(
                "2000",
                "C-3PO",
                &["1000", "1002", "1003", "2001"],
                &[NewHope, Empire, Jedi],
                Some("Protocol"),
            ),
            Droid::new(
                "2001",
                "R2-D2",
                &["1000", "1002", "1003"],
                &[NewHope, Empire, Jedi],
                Some("Astromech"),
            ),
        ];

        Self {
            humans: humans.into_iter().map(|h| (h.id.clone(), h)).collect(),
            droids: droids.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    pub fn get_human(&self, id: &str) -> Option<&Human> {
        self.humans.get(id)
    }

    pub fn get_droid(&self, id: &str) -> Option<&Droid> {
        self.droids.get(id)
    }

    /// Looks a character up among humans and droids, tagged with its type.
    pub fn get_character(&self, id: &str) -> Option<HostValue> {
        self.get_human(id)
            .map(|h| HostValue::typed("Human", HostValue::new(h.clone())))
            .or_else(|| {
                self.get_droid(id)
                    .map(|d| HostValue::typed("Droid", HostValue::new(d.clone())))
            })
    }

    pub fn get_hero(&self, episode: Option<Episode>) -> HostValue {
        let id = if episode == Some(Episode::Empire) {
            "1000"
        } else {
            "2001"
        };
        self.get_character(id).unwrap_or_default()
    }
}
