use anyhow::Result;

use super::{constraint_error, ensure_found, Database, Write};
use crate::models::{Property, PropertyImage};

const PROPERTY_COLUMNS: &str = "id, listing_code, title, property_type, address, price, area, \
     bedrooms, status, agent_id, description, listed_on";

const PROPERTY: Write<'static> = Write::Save {
    duplicate: "A property with this listing code",
    record: "property",
};

impl Database {
    pub async fn load_properties(&self) -> Result<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY listed_on DESC, listing_code ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(properties)
    }

    pub async fn get_property(&self, id: i32) -> Result<Property> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(property)
    }

    pub async fn create_property(&self, property: &Property) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO properties
                (listing_code, title, property_type, address, price, area, bedrooms,
                 status, agent_id, description, listed_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&property.listing_code)
        .bind(&property.title)
        .bind(property.property_type.as_str())
        .bind(&property.address)
        .bind(property.price)
        .bind(property.area)
        .bind(property.bedrooms)
        .bind(property.status.as_str())
        .bind(property.agent_id)
        .bind(&property.description)
        .bind(property.listed_on)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, PROPERTY))?;

        Ok(id)
    }

    pub async fn update_property(&self, property: &Property) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE properties
            SET listing_code = $1, title = $2, property_type = $3, address = $4, price = $5,
                area = $6, bedrooms = $7, status = $8, agent_id = $9, description = $10,
                listed_on = $11
            WHERE id = $12
            "#,
        )
        .bind(&property.listing_code)
        .bind(&property.title)
        .bind(property.property_type.as_str())
        .bind(&property.address)
        .bind(property.price)
        .bind(property.area)
        .bind(property.bedrooms)
        .bind(property.status.as_str())
        .bind(property.agent_id)
        .bind(&property.description)
        .bind(property.listed_on)
        .bind(property.id)
        .execute(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, PROPERTY))?;

        ensure_found(result.rows_affected(), "Property", property.id)
    }

    /// Delete a property and its image rows, returning the stored image paths.
    pub async fn delete_property(&self, id: i32) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let paths = sqlx::query_scalar::<_, String>(
            "DELETE FROM property_images WHERE property_id = $1 RETURNING file_path",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| constraint_error(e, Write::Delete("This property")))?;
        ensure_found(result.rows_affected(), "Property", id)?;

        tx.commit().await?;

        Ok(paths)
    }

    pub async fn load_property_images(&self, property_id: i32) -> Result<Vec<PropertyImage>> {
        let images = sqlx::query_as::<_, PropertyImage>(
            "SELECT id, property_id, file_path, added_on FROM property_images \
             WHERE property_id = $1 ORDER BY id ASC",
        )
        .bind(property_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(images)
    }

    pub async fn add_property_image(&self, property_id: i32, file_path: &str) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO property_images (property_id, file_path) VALUES ($1, $2) RETURNING id",
        )
        .bind(property_id)
        .bind(file_path)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    /// Remove an image row and return the file it pointed to.
    pub async fn delete_property_image(&self, id: i32) -> Result<String> {
        let path = sqlx::query_scalar::<_, String>(
            "DELETE FROM property_images WHERE id = $1 RETURNING file_path",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(path)
    }
}
