#![forbid(unsafe_code)]

pub const WANTED_LABEL: &str = "Wanted";
pub const ARRESTED_LABEL: &str = "Arrested";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrestStatus {
    pub wanted: u64,
    pub arrested: u64,
}

impl ArrestStatus {
    /// Always both buckets, `Wanted` first, even when one of them is zero.
    pub fn buckets(&self) -> [(&'static str, u64); 2] {
        [
            (WANTED_LABEL, self.wanted),
            (ARRESTED_LABEL, self.arrested),
        ]
    }
}

pub fn arrest_status_counts(flags: &[bool]) -> ArrestStatus {
    flags
        .iter()
        .fold(ArrestStatus::default(), |mut status, &arrested| {
            if arrested {
                status.arrested += 1;
            } else {
                status.wanted += 1;
            }
            status
        })
}
