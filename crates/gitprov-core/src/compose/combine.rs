use gitprov_model::ProvDocument;

use crate::error::Result;

/// Union of the given documents.
///
/// Elements with the same identifier are joined and duplicate statements
/// collapse, so the result does not depend on input order and
/// `combine([d, d]) == d`.
pub fn combine<'a, I>(documents: I) -> Result<ProvDocument>
where
    I: IntoIterator<Item = &'a ProvDocument>,
{
    let mut documents = documents.into_iter();
    let Some(first) = documents.next() else {
        return Ok(ProvDocument::default());
    };
    let mut combined = first.clone();
    let mut count = 1;
    for document in documents {
        combined.extend(document)?;
        count += 1;
    }
    tracing::info!(
        "Combined {} documents into {} statements",
        count,
        combined.relations().count()
    );
    Ok(combined)
}
