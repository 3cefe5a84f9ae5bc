//! Static sample pools used by the built-in replacers.

pub const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Camille", "Daniel", "Emma", "Francois", "Gabriel", "Helene", "Hugo",
    "Ines", "Jack", "Julie", "Louis", "Manon", "Nathan", "Oceane", "Paul", "Sarah", "Thomas",
    "Zoe",
];

pub const LAST_NAMES: &[&str] = &[
    "Bernard", "Bonnet", "Dubois", "Durand", "Fontaine", "Garcia", "Girard", "Lambert",
    "Laurent", "Lefebvre", "Leroy", "Martin", "Mercier", "Moreau", "Petit", "Richard", "Robert",
    "Roux", "Simon", "Thomas",
];

pub const COMPANIES: &[&str] = &[
    "Acme", "Bluewave", "Cobalt", "Dynamo", "Evergreen", "Falcon", "Granite", "Horizon",
    "Ironbridge", "Juniper", "Keystone", "Lumen", "Meridian", "Northwind", "Orbit", "Pioneer",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "Consulting", "Industries", "Systems", "Partners", "Logistics", "Labs", "Group", "Holdings",
    "Services", "Solutions", "Technologies", "Ventures",
];

pub const MAIL_EXTS: &[&str] = &["mail", "inbox", "post", "webmail", "box", "courrier"];
