//! Doctor directory: specialty search and paging.
//!
//! The directory lists doctors with their specialty and address. A search narrows the list by
//! specialty and shows it a fixed number of doctors per page. Changing the specialty always
//! returns to the first page.

use crate::constants::DOCTORS_PER_PAGE;
use medwell_types::SearchQuery;

/// One doctor listing.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Doctor {
    /// Listing id; not guaranteed unique
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Doctor {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        specialty: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            specialty: specialty.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }
}

/// Returns the built-in doctor listings in their fixed order.
///
/// The last five entries repeat the same listing, so the set spans two pages.
pub fn fallback_doctors() -> Vec<Doctor> {
    let mut doctors = vec![
        Doctor::new(
            1,
            "Dr. Sanika",
            "General Physician",
            "123 MG Road, Bangalore, Karnataka",
            12.9716,
            77.5946,
        ),
        Doctor::new(
            2,
            "Dr. Nishikant",
            "Pediatrician",
            "456 Anna Salai, Chennai, Tamil Nadu",
            13.0827,
            80.2707,
        ),
        Doctor::new(
            3,
            "Mc. Rohit Seshmukh",
            "Church priest",
            "789 SV Road, Mumbai, Maharashtra",
            19.0760,
            72.8777,
        ),
        Doctor::new(
            4,
            "Dr. Rehan 👁️sha",
            "Gynecologist",
            "101 Camac Street, Kolkata, West Bengal",
            22.5726,
            88.3639,
        ),
    ];
    let orthopedic = Doctor::new(
        5,
        "Dr. Vivek Backender",
        "Orthopedic Surgeon",
        "202 Banjara Hills, Hyderabad, Telangana",
        17.4126,
        78.4387,
    );
    doctors.extend(std::iter::repeat(orthopedic).take(5));
    doctors
}

/// Doctors whose specialty contains `specialty`, ignoring case, in listing order.
///
/// An empty query keeps every doctor.
pub fn filter_doctors<'a>(doctors: &'a [Doctor], specialty: &SearchQuery) -> Vec<&'a Doctor> {
    let filtered: Vec<&Doctor> = doctors
        .iter()
        .filter(|doctor| specialty.matches(&doctor.specialty))
        .collect();
    tracing::debug!(
        "doctor filter '{}' kept {} of {}",
        specialty,
        filtered.len(),
        doctors.len()
    );
    filtered
}

/// One page of a longer list.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    /// Number of non-empty pages; `0` for an empty list
    pub total_pages: usize,
}

/// Returns page `page` (1-based) of `items`, `per_page` at a time.
///
/// Page `n` covers `items[(n - 1) * per_page .. n * per_page]`, clipped to the list. Page `0`
/// and pages past the end are empty. A `per_page` of `0` is treated as `1`.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let items = match page.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(per_page).min(total_items);
            let end = page.saturating_mul(per_page).min(total_items);
            items[start..end].to_vec()
        }
        None => Vec::new(),
    };

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// Specialty filter and current page of a doctor search.
///
/// Immutable: every change returns a new state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorSearch {
    specialty: SearchQuery,
    page: usize,
}

impl Default for DoctorSearch {
    fn default() -> Self {
        Self {
            specialty: SearchQuery::default(),
            page: 1,
        }
    }
}

impl DoctorSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specialty(&self) -> &SearchQuery {
        &self.specialty
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the specialty filter and returns to the first page.
    pub fn with_specialty(&self, specialty: SearchQuery) -> Self {
        Self { specialty, page: 1 }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            specialty: self.specialty.clone(),
            page,
        }
    }
}

/// Read-only doctor listings.
#[derive(Clone, Debug, PartialEq)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new(fallback_doctors())
    }
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    /// Applies `search` and returns the requested page of matches.
    pub fn search(&self, search: &DoctorSearch) -> Page<&Doctor> {
        let filtered = filter_doctors(&self.doctors, search.specialty());
        paginate(&filtered, search.page(), DOCTORS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(doctors: &[&'a Doctor]) -> Vec<&'a str> {
        doctors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn fallback_set_spans_two_pages() {
        let doctors = fallback_doctors();
        assert_eq!(doctors.len(), 9);

        let directory = DoctorDirectory::default();
        let first = directory.search(&DoctorSearch::new());
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.items[0].name, "Dr. Sanika");

        let second = directory.search(&DoctorSearch::new().with_page(2));
        assert_eq!(second.items.len(), 4);
        assert!(second.items.iter().all(|d| d.id == 5));
    }

    #[test]
    fn specialty_filter_ignores_case() {
        let doctors = fallback_doctors();
        let found = filter_doctors(&doctors, &SearchQuery::new("PEDIA"));
        assert_eq!(names(&found), vec!["Dr. Nishikant"]);

        let found = filter_doctors(&doctors, &SearchQuery::new("surgeon"));
        assert_eq!(found.len(), 5);

        assert_eq!(filter_doctors(&doctors, &SearchQuery::default()).len(), 9);
        assert!(filter_doctors(&doctors, &SearchQuery::new("dentist")).is_empty());
    }

    #[test]
    fn changing_specialty_returns_to_first_page() {
        let search = DoctorSearch::new().with_page(2);
        assert_eq!(search.page(), 2);

        let narrowed = search.with_specialty(SearchQuery::new("gyn"));
        assert_eq!(narrowed.page(), 1);

        let directory = DoctorDirectory::default();
        let page = directory.search(&narrowed);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items[0].name, "Dr. Rehan 👁️sha");
    }

    #[test]
    fn paginate_clips_to_the_list() {
        let items: Vec<u32> = (1..=12).collect();

        let page = paginate(&items, 3, 5);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 12);

        assert!(paginate(&items, 4, 5).items.is_empty());
        assert!(paginate(&items, 0, 5).items.is_empty());
        assert!(paginate(&items, usize::MAX, 5).items.is_empty());

        let empty = paginate::<u32>(&[], 1, 5);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);

        assert_eq!(paginate(&items, 2, 0).items, vec![2]);
    }
}
