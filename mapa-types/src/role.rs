use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown for users that hold no recognised role.
pub const COMMUNITY_LABEL: &str = "Miembro de la Comunidad";

/// Relationship a user has with the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "exstudent")]
    ExStudent,
    #[serde(rename = "teacher")]
    Teacher,
    #[serde(rename = "employee")]
    NonTeachingStaff,
    #[serde(rename = "familia", alias = "family")]
    Family,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::ExStudent,
        Role::Teacher,
        Role::NonTeachingStaff,
        Role::Family,
    ];

    /// Parse the directory's role tag. Unknown tags yield `None`.
    ///
    /// ```
    /// use mapa_types::role::Role;
    ///
    /// assert_eq!(Role::from_tag("exstudent"), Some(Role::ExStudent));
    /// assert_eq!(Role::from_tag("family"), Some(Role::Family));
    /// assert_eq!(Role::from_tag("principal"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "student" => Some(Role::Student),
            "exstudent" => Some(Role::ExStudent),
            "teacher" => Some(Role::Teacher),
            "employee" => Some(Role::NonTeachingStaff),
            "familia" | "family" => Some(Role::Family),
            _ => None,
        }
    }

    /// The tag used by the directory service.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::ExStudent => "exstudent",
            Role::Teacher => "teacher",
            Role::NonTeachingStaff => "employee",
            Role::Family => "familia",
        }
    }

    /// Whether the role carries work years.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Teacher | Role::NonTeachingStaff)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A set of roles. An empty set is a plain community member.
///
/// Serialized as a list of role tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn remove(&mut self, role: Role) {
        self.0 &= !role.bit();
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Roles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.has_role(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.iter().collect()
    }
}

/// Employment state of a teacher or non-teaching staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenureStatus {
    #[default]
    Current,
    Ended(u16),
    Unspecified,
}

/// Work years for staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tenure {
    pub start_year: Option<u16>,
    pub status: TenureStatus,
}

impl Tenure {
    /// Resolve the directory's loose work fields into a tenure.
    ///
    /// A "currently working" flag wins over an end year. With neither
    /// given the member is considered current, which is what the
    /// directory assumes for new staff records.
    pub fn from_parts(
        start_year: Option<u16>,
        end_year: Option<u16>,
        currently_working: Option<bool>,
    ) -> Self {
        let status = match (currently_working, end_year) {
            (Some(true), _) => TenureStatus::Current,
            (_, Some(end)) => TenureStatus::Ended(end),
            (None, None) => TenureStatus::Current,
            (Some(false), None) => TenureStatus::Unspecified,
        };
        Self { start_year, status }
    }

    pub fn is_current(&self) -> bool {
        self.status == TenureStatus::Current
    }

    pub fn end_year(&self) -> Option<u16> {
        match self.status {
            TenureStatus::Ended(year) => Some(year),
            _ => None,
        }
    }

    fn label_suffix(&self) -> String {
        match (self.start_year, self.status) {
            (None, _) => String::new(),
            (Some(start), TenureStatus::Ended(end)) => format!(" - Desde {} a {}", start, end),
            (Some(start), _) => format!(" - Desde {}", start),
        }
    }
}

/// A held role together with the attributes that only make sense for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Membership {
    Student,
    ExStudent { graduation_year: Option<u16> },
    Teacher(Tenure),
    NonTeachingStaff(Tenure),
    Family,
}

impl Membership {
    pub fn role(&self) -> Role {
        match self {
            Membership::Student => Role::Student,
            Membership::ExStudent { .. } => Role::ExStudent,
            Membership::Teacher(_) => Role::Teacher,
            Membership::NonTeachingStaff(_) => Role::NonTeachingStaff,
            Membership::Family => Role::Family,
        }
    }

    pub fn graduation_year(&self) -> Option<u16> {
        match self {
            Membership::ExStudent { graduation_year } => *graduation_year,
            _ => None,
        }
    }

    pub fn tenure(&self) -> Option<&Tenure> {
        match self {
            Membership::Teacher(tenure) | Membership::NonTeachingStaff(tenure) => Some(tenure),
            _ => None,
        }
    }

    /// Detail-view label for this membership.
    ///
    /// ```
    /// use mapa_types::role::{Membership, Tenure};
    ///
    /// let grad = Membership::ExStudent { graduation_year: Some(1990) };
    /// assert_eq!(grad.label(), "Ex Alumno/a - Promoción 1990");
    ///
    /// let teacher = Membership::Teacher(Tenure::from_parts(Some(2001), Some(2010), None));
    /// assert_eq!(teacher.label(), "Docente - Desde 2001 a 2010");
    /// ```
    pub fn label(&self) -> String {
        match self {
            Membership::Student => "Alumno/a".to_string(),
            Membership::Family => "Familia".to_string(),
            Membership::ExStudent { graduation_year } => match graduation_year {
                Some(year) => format!("Ex Alumno/a - Promoción {}", year),
                None => "Ex Alumno/a".to_string(),
            },
            Membership::Teacher(tenure) => format!("Docente{}", tenure.label_suffix()),
            Membership::NonTeachingStaff(tenure) => {
                format!("Personal No Docente{}", tenure.label_suffix())
            }
        }
    }
}
