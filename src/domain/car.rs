use serde::{Deserialize, Serialize};

/// A registered vehicle. The plate number is the unique key and never
/// changes once the car is registered; the remaining attributes are
/// free-text details captured at the counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub plate_number: String,
    pub car_type: String,
    pub car_size: String,
    pub driver_name: String,
    pub phone_number: String,
}

impl Car {
    pub fn new(
        plate_number: impl Into<String>,
        car_type: impl Into<String>,
        car_size: impl Into<String>,
        driver_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            plate_number: plate_number.into(),
            car_type: car_type.into(),
            car_size: car_size.into(),
            driver_name: driver_name.into(),
            phone_number: phone_number.into(),
        }
    }
}
