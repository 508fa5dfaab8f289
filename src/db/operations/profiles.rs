use deadpool_postgres::Pool;

use crate::db::{
    error::Result,
    types::{FarmerProfile, ProfileUpdate},
};

pub async fn find_by_user(pool: &Pool, user_id: i32) -> Result<Option<FarmerProfile>> {
    let conn = pool.get().await?;
    let row = conn
        .query_opt(
            "SELECT * FROM farmer_profiles WHERE user_id = $1",
            &[&user_id],
        )
        .await?;
    Ok(row.as_ref().map(FarmerProfile::from))
}

/// Apply `update` to the user's profile, creating the profile if absent
pub async fn upsert(pool: &Pool, user_id: i32, update: &ProfileUpdate) -> Result<FarmerProfile> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO farmer_profiles
                (user_id, full_name, farm_location, farm_size, crops_grown,
                 state, district, pin_code, aadhar_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (user_id) DO UPDATE SET
                full_name     = COALESCE(EXCLUDED.full_name, farmer_profiles.full_name),
                farm_location = COALESCE(EXCLUDED.farm_location, farmer_profiles.farm_location),
                farm_size     = COALESCE(EXCLUDED.farm_size, farmer_profiles.farm_size),
                crops_grown   = COALESCE(EXCLUDED.crops_grown, farmer_profiles.crops_grown),
                state         = COALESCE(EXCLUDED.state, farmer_profiles.state),
                district      = COALESCE(EXCLUDED.district, farmer_profiles.district),
                pin_code      = COALESCE(EXCLUDED.pin_code, farmer_profiles.pin_code),
                aadhar_number = COALESCE(EXCLUDED.aadhar_number, farmer_profiles.aadhar_number)
             RETURNING *",
            &[
                &user_id,
                &update.full_name,
                &update.farm_location,
                &update.farm_size,
                &update.crops_grown,
                &update.state,
                &update.district,
                &update.pin_code,
                &update.aadhar_number,
            ],
        )
        .await?;
    Ok(FarmerProfile::from(&row))
}
