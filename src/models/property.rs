use super::text_enum;

text_enum!(
    /// Kind of real estate behind a listing.
    PropertyType, "property type", {
        Apartment => "apartment",
        Villa => "villa",
        House => "house",
        Land => "land",
        Shop => "shop",
        Office => "office",
    }
);

text_enum!(
    /// Where a listing stands commercially.
    PropertyStatus, "property status", {
        Available => "available",
        Reserved => "reserved",
        Sold => "sold",
        Rented => "rented",
    }
);

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Property {
    pub id: i32,
    pub listing_code: String,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub property_type: PropertyType,
    pub address: String,
    pub price: f64,
    /// Surface in square metres
    pub area: f64,
    pub bedrooms: i32,
    #[sqlx(try_from = "String")]
    pub status: PropertyStatus,
    /// Employee handling the listing
    pub agent_id: Option<i32>,
    pub description: Option<String>,
    pub listed_on: chrono::NaiveDate,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PropertyImage {
    pub id: i32,
    pub property_id: i32,
    pub file_path: String,
    pub added_on: chrono::NaiveDate,
}
