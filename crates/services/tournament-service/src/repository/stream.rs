//! Lazy, chunked entity streams for list queries.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, Select};

use common::{AppError, AppResult, Pagination};

/// Rows fetched per round trip while a stream is polled
pub const STREAM_CHUNK_SIZE: u64 = 32;

/// Single-pass sequence of entities. Nothing is queried until it is polled.
pub type EntityStream<T> = BoxStream<'static, AppResult<T>>;

/// Stream the requested page of `select` in bounded chunks.
///
/// `select` must already carry its ordering; chunks are taken with
/// offset/limit on top of it and the stream ends early when the store runs
/// out of rows.
pub(crate) fn paged<E, T>(
    db: DatabaseConnection,
    select: Select<E>,
    pagination: Pagination,
    convert: fn(E::Model) -> T,
) -> EntityStream<T>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    T: Send + 'static,
{
    let chunk = STREAM_CHUNK_SIZE.min(pagination.limit());

    stream::try_unfold(
        (pagination.offset(), pagination.limit()),
        move |(offset, remaining)| {
            let db = db.clone();
            let select = select.clone();
            async move {
                if remaining == 0 {
                    return Ok::<_, AppError>(None);
                }

                let wanted = remaining.min(chunk);
                let rows = select.offset(offset).limit(wanted).all(&db).await?;
                let fetched = rows.len() as u64;
                if fetched == 0 {
                    return Ok(None);
                }

                // A short chunk means the table is exhausted
                let remaining = if fetched < wanted { 0 } else { remaining - fetched };
                Ok(Some((rows, (offset.saturating_add(fetched), remaining))))
            }
        },
    )
    .map_ok(move |rows| stream::iter(rows.into_iter().map(convert).map(Ok::<T, AppError>)))
    .try_flatten()
    .boxed()
}
