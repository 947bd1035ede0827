use crate::domain::{GeoLocation, Store};

fn store(id: u32, name: &str, address: &str, hours: &str, is_open: bool, lat: f64, lng: f64) -> Store {
    Store {
        id,
        name: name.to_string(),
        address: address.to_string(),
        hours: hours.to_string(),
        is_open,
        location: GeoLocation::new(lat, lng),
    }
}

/// Lagos stores shown on the locator page.
pub fn stores() -> Vec<Store> {
    vec![
        store(1, "bokku! Ikeja", "14 Allen Avenue, Ikeja", "8:00 AM - 9:00 PM", true, 6.6018, 3.3515),
        store(2, "bokku! Yaba", "32 Herbert Macaulay Way, Yaba", "8:00 AM - 9:00 PM", true, 6.5095, 3.3711),
        store(3, "bokku! Surulere", "5 Adeniran Ogunsanya Street, Surulere", "9:00 AM - 8:00 PM", false, 6.4968, 3.3553),
        store(4, "bokku! Lekki", "Admiralty Way, Lekki Phase 1", "8:00 AM - 10:00 PM", true, 6.4474, 3.4723),
        store(5, "bokku! Victoria Island", "Adeola Odeku Street, Victoria Island", "8:00 AM - 9:00 PM", true, 6.4281, 3.4219),
        store(6, "bokku! Ikorodu", "Ikorodu Road, Ikorodu", "8:00 AM - 8:00 PM", false, 6.6194, 3.5105),
    ]
}
