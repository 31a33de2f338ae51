//! Vendor classification for log pages.
//!
//! Page identifiers below [`GENERIC_PAGE_THRESHOLD`] always resolve against
//! the generic descriptor set regardless of the attached device. Above the
//! threshold the device's reported vendor name decides which vendor
//! directory holds the descriptors.

use std::fmt;

/// Page ids below this value are generic spec pages. The compare is on the
/// decimal value of the id; every known vendor page sits at 0x5C or above,
/// so the two readings coincide.
pub const GENERIC_PAGE_THRESHOLD: u16 = 92;

/// Known vendor tags.
///
/// A closed set: classification happens once, in [`Vendor::classify`], and
/// the rest of the system dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Pages defined by the base specification
    Generic,
    /// Dell (letter-coded spec versions, e.g. "A06")
    Dell,
    /// CalX family; several reported names canonicalize here
    CalX,
    /// Lenovo
    Lenovo,
    /// HP
    Hp,
    /// Asus
    Asus,
    /// AWS
    Aws,
    /// Facebook
    Facebook,
    /// Microsoft
    Msft,
    /// Any other reported vendor, title-cased
    Other(String),
}

impl Vendor {
    /// Classify a page request from its id and the device's reported
    /// vendor name.
    ///
    /// Ids below the generic threshold are always [`Vendor::Generic`].
    /// Otherwise the reported name is case-folded to title form and name
    /// families beginning with "Calx" (e.g. "calx2microsofteng") collapse
    /// to the CalX umbrella tag.
    pub fn classify(page_id: u16, device_vendor: &str) -> Vendor {
        if page_id < GENERIC_PAGE_THRESHOLD {
            return Vendor::Generic;
        }
        let titled = title_case(device_vendor);
        if titled.starts_with("Calx") {
            return Vendor::CalX;
        }
        match titled.as_str() {
            "Dell" => Vendor::Dell,
            "Lenovo" => Vendor::Lenovo,
            "Hp" => Vendor::Hp,
            "Asus" => Vendor::Asus,
            "Aws" => Vendor::Aws,
            "Facebook" => Vendor::Facebook,
            "Msft" => Vendor::Msft,
            _ => Vendor::Other(titled),
        }
    }

    /// Map an already-normalized vendor name (as spelled in descriptor
    /// files and directory names) to its tag.
    pub fn from_name(name: &str) -> Vendor {
        let titled = title_case(name);
        if titled.starts_with("Calx") {
            return Vendor::CalX;
        }
        match titled.as_str() {
            "Generic" => Vendor::Generic,
            "Dell" => Vendor::Dell,
            "Lenovo" => Vendor::Lenovo,
            "Hp" => Vendor::Hp,
            "Asus" => Vendor::Asus,
            "Aws" => Vendor::Aws,
            "Facebook" => Vendor::Facebook,
            "Msft" => Vendor::Msft,
            _ => Vendor::Other(titled),
        }
    }

    /// Whether this is the generic tag.
    pub fn is_generic(&self) -> bool {
        matches!(self, Vendor::Generic)
    }

    /// Directory name under the descriptor root.
    pub fn dir_name(&self) -> &str {
        match self {
            Vendor::Generic => "Generic",
            Vendor::Dell => "Dell",
            Vendor::CalX => "CalX",
            Vendor::Lenovo => "Lenovo",
            Vendor::Hp => "Hp",
            Vendor::Asus => "Asus",
            Vendor::Aws => "Aws",
            Vendor::Facebook => "Facebook",
            Vendor::Msft => "Msft",
            Vendor::Other(name) => name,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Fold each whitespace-separated word to Title case, the normal form for
/// reported vendor names.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in s.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_page_ids_are_generic_for_any_vendor() {
        assert_eq!(Vendor::classify(0x02, "DELL"), Vendor::Generic);
        assert_eq!(Vendor::classify(91, "calx2microsofteng"), Vendor::Generic);
    }

    #[test]
    fn vendor_pages_classify_by_reported_name() {
        assert_eq!(Vendor::classify(0xCA, "DELL"), Vendor::Dell);
        assert_eq!(Vendor::classify(0xDF, "lenovo"), Vendor::Lenovo);
        assert_eq!(Vendor::classify(0xC0, "MSFT"), Vendor::Msft);
        assert_eq!(Vendor::classify(0xFB, "FACEBOOK"), Vendor::Facebook);
    }

    #[test]
    fn calx_family_collapses_to_umbrella_tag() {
        assert_eq!(Vendor::classify(0xD0, "calx2microsofteng"), Vendor::CalX);
        assert_eq!(Vendor::classify(0xD0, "CALX3MICROSOFTENG"), Vendor::CalX);
    }

    #[test]
    fn unknown_vendor_is_title_cased() {
        let vendor = Vendor::classify(0xC5, "SEAGATE");
        assert_eq!(vendor, Vendor::Other("Seagate".to_string()));
        assert_eq!(vendor.dir_name(), "Seagate");
    }

    #[test]
    fn threshold_boundary() {
        assert_eq!(Vendor::classify(91, "DELL"), Vendor::Generic);
        assert_eq!(Vendor::classify(92, "DELL"), Vendor::Dell);
    }
}
