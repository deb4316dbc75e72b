use crate::error::{ArchivistError, Result};

#[must_use]
pub(super) fn read_non_empty<L>(lookup: &L, name: &str) -> Option<String>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(super) fn read_u64<L>(lookup: &L, name: &str) -> Result<Option<u64>>
where
    L: Fn(&str) -> Option<String>,
{
    read_non_empty(lookup, name)
        .map(|raw| {
            raw.parse::<u64>().map_err(|_| {
                ArchivistError::Validation(format!("invalid {name}: {raw} (expected an integer)"))
            })
        })
        .transpose()
}

pub(super) fn read_usize<L>(lookup: &L, name: &str) -> Result<Option<usize>>
where
    L: Fn(&str) -> Option<String>,
{
    read_non_empty(lookup, name)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| {
                ArchivistError::Validation(format!("invalid {name}: {raw} (expected an integer)"))
            })
        })
        .transpose()
}
