//! Narrowing the directory before clustering.

use mapa_types::point::UserPoint;
use mapa_types::role::Role;
use serde::{Deserialize, Serialize};

/// Criteria a user must meet to stay on the map.
///
/// Year criteria only apply to the role they belong to: a graduation year
/// narrows ex-students, work years narrow teachers and non-teaching staff.
/// Without a role every user matches.
///
/// ```
/// use mapa::filter::DirectoryFilter;
/// use mapa::{Membership, Point, Role, UserPoint};
///
/// let grad = UserPoint::new("1", "Ana", Point::new(0.0, 0.0))
///     .with_membership(Membership::ExStudent { graduation_year: Some(1999) });
///
/// assert!(DirectoryFilter::role(Role::ExStudent).with_graduation_year(1999).matches(&grad));
/// assert!(!DirectoryFilter::role(Role::ExStudent).with_graduation_year(2000).matches(&grad));
/// assert!(!DirectoryFilter::role(Role::Teacher).matches(&grad));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFilter {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub graduation_year: Option<u16>,
    /// Work started in or after this year
    #[serde(default)]
    pub work_start_from: Option<u16>,
    /// Work ended in or before this year
    #[serde(default)]
    pub work_end_until: Option<u16>,
    /// Ask for people still working at the school; only turns off
    /// `work_end_until`, staff whose work ended still match
    #[serde(default)]
    pub currently_working: bool,
}

impl DirectoryFilter {
    /// A filter that keeps everyone.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn with_graduation_year(mut self, year: u16) -> Self {
        self.graduation_year = Some(year);
        self
    }

    pub fn with_work_start_from(mut self, year: u16) -> Self {
        self.work_start_from = Some(year);
        self
    }

    pub fn with_work_end_until(mut self, year: u16) -> Self {
        self.work_end_until = Some(year);
        self
    }

    pub fn currently_working(mut self) -> Self {
        self.currently_working = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none()
    }

    pub fn matches(&self, user: &UserPoint) -> bool {
        let Some(role) = self.role else {
            return true;
        };
        let Some(membership) = user.membership(role) else {
            return false;
        };

        if role == Role::ExStudent
            && let Some(year) = self.graduation_year
        {
            return membership.graduation_year() == Some(year);
        }

        if role.is_staff() {
            let tenure = membership.tenure();

            if let Some(from) = self.work_start_from {
                match tenure.and_then(|t| t.start_year) {
                    Some(start) if start >= from => {}
                    _ => return false,
                }
            }

            if !self.currently_working
                && let Some(until) = self.work_end_until
            {
                return tenure
                    .and_then(|t| t.end_year())
                    .is_some_and(|end| end <= until);
            }
        }

        true
    }

    /// Users that match, in input order.
    pub fn apply<'a>(&'a self, users: &'a [UserPoint]) -> impl Iterator<Item = &'a UserPoint> + 'a {
        users.iter().filter(move |u| self.matches(u))
    }
}
