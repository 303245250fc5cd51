use orders_model::PageDescriptor;

/// Window `items` to `[skip, skip + take)`, clamped to the available range.
pub(crate) fn page<T>(items: Vec<T>, page: Option<PageDescriptor>) -> Vec<T> {
    let Some(page) = page else {
        return items;
    };
    if page.take == 0 || page.skip >= items.len() {
        return Vec::new();
    }
    items.into_iter().skip(page.skip).take(page.take).collect()
}
