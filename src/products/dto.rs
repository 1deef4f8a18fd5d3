use super::repo_types::{NewProduct, ProductChanges};
use crate::validation::{require_non_empty, FieldError, Validate};

/// Text fields of a product multipart form, as received.
#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Form submitted to `POST /product`.
#[derive(Debug)]
pub struct CreateProduct(pub ProductForm);

/// Form submitted to `PUT /product/:id`; every field is optional.
#[derive(Debug)]
pub struct UpdateProduct(pub ProductForm);

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

fn check_price(errors: &mut Vec<FieldError>, raw: &str) {
    if parse_price(raw).is_none() {
        errors.push(FieldError::new("price", "price must be a number"));
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Validate for CreateProduct {
    fn validate(&self) -> Vec<FieldError> {
        let form = &self.0;
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "name", form.name.as_deref().unwrap_or_default());
        match form.price.as_deref() {
            Some(raw) => check_price(&mut errors, raw),
            None => errors.push(FieldError::new("price", "price should not be empty")),
        }
        require_non_empty(
            &mut errors,
            "category",
            form.category.as_deref().unwrap_or_default(),
        );
        errors
    }
}

impl Validate for UpdateProduct {
    fn validate(&self) -> Vec<FieldError> {
        let form = &self.0;
        let mut errors = Vec::new();
        if let Some(name) = form.name.as_deref() {
            require_non_empty(&mut errors, "name", name);
        }
        if let Some(raw) = form.price.as_deref() {
            check_price(&mut errors, raw);
        }
        if let Some(category) = form.category.as_deref() {
            require_non_empty(&mut errors, "category", category);
        }
        errors
    }
}

impl CreateProduct {
    /// Call only after validation; `image` is the uploaded file's URL, if any.
    pub fn into_new_product(self, image: Option<String>) -> NewProduct {
        let form = self.0;
        NewProduct {
            name: form.name.unwrap_or_default().trim().to_string(),
            price: form.price.as_deref().and_then(parse_price).unwrap_or_default(),
            description: non_blank(form.description),
            image,
            category: form.category.unwrap_or_default().trim().to_string(),
        }
    }
}

impl UpdateProduct {
    /// Call only after validation; `image: None` keeps the current image.
    pub fn into_changes(self, image: Option<String>) -> ProductChanges {
        let form = self.0;
        ProductChanges {
            name: non_blank(form.name),
            price: form.price.as_deref().and_then(parse_price),
            description: non_blank(form.description),
            image,
            category: non_blank(form.category),
        }
    }
}
