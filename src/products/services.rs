use tracing::info;
use uuid::Uuid;

use super::repo_types::{NewProduct, Product, ProductChanges};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Product with ID \"{id}\" not found"))
}

/// Ids that are not UUIDs cannot name a product, so they are simply not found.
fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| not_found(id))
}

pub async fn create(st: &AppState, product: NewProduct) -> AppResult<Product> {
    let created = st.products.insert(product).await?;
    info!(product_id = %created.id, has_image = created.image.is_some(), "product created");
    Ok(created)
}

pub async fn find_all(st: &AppState) -> AppResult<Vec<Product>> {
    st.products.list().await
}

pub async fn find_one(st: &AppState, id: &str) -> AppResult<Product> {
    let uuid = parse_id(id)?;
    st.products.get(uuid).await?.ok_or_else(|| not_found(id))
}

pub async fn update(st: &AppState, id: &str, changes: ProductChanges) -> AppResult<Product> {
    let uuid = parse_id(id)?;
    let updated = st
        .products
        .update(uuid, changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(product_id = %updated.id, "product updated");
    Ok(updated)
}

pub async fn remove(st: &AppState, id: &str) -> AppResult<()> {
    let uuid = parse_id(id)?;
    if !st.products.delete(uuid).await? {
        return Err(not_found(id));
    }
    info!(product_id = %uuid, "product deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug(image: Option<&str>) -> NewProduct {
        NewProduct {
            name: "Mug".into(),
            price: 12.5,
            description: Some("Stoneware".into()),
            image: image.map(Into::into),
            category: "kitchen".into(),
        }
    }

    #[tokio::test]
    async fn create_then_find_one_round_trips() {
        let st = AppState::fake();
        let created = create(&st, mug(None)).await.unwrap();
        let found = find_one(&st, &created.id.to_string()).await.unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Mug");
        assert_eq!(found.price, 12.5);
        assert_eq!(found.description.as_deref(), Some("Stoneware"));
        assert_eq!(found.category, "kitchen");
        assert_eq!(found.image, None);
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let st = AppState::fake();
        let missing = Uuid::new_v4().to_string();

        for id in [missing.as_str(), "not-a-uuid"] {
            let err = find_one(&st, id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(ref m) if m.contains(id)));
            let err = update(&st, id, ProductChanges::default()).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
            let err = remove(&st, id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn update_without_image_keeps_previous_one() {
        let st = AppState::fake();
        let created = create(&st, mug(Some("https://cdn/product/a.png"))).await.unwrap();
        let id = created.id.to_string();

        let updated = update(
            &st,
            &id,
            ProductChanges {
                price: Some(9.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 9.0);
        assert_eq!(updated.name, "Mug");
        assert_eq!(updated.image.as_deref(), Some("https://cdn/product/a.png"));

        let replaced = update(
            &st,
            &id,
            ProductChanges {
                image: Some("https://cdn/product/b.png".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(replaced.image.as_deref(), Some("https://cdn/product/b.png"));
    }

    #[tokio::test]
    async fn remove_deletes_once() {
        let st = AppState::fake();
        let created = create(&st, mug(None)).await.unwrap();
        let id = created.id.to_string();
        remove(&st, &id).await.unwrap();
        assert!(matches!(find_one(&st, &id).await, Err(AppError::NotFound(_))));
        assert!(matches!(remove(&st, &id).await, Err(AppError::NotFound(_))));
        assert!(find_all(&st).await.unwrap().is_empty());
    }
}
