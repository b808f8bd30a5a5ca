// Batch indexing of raw capture files by device, channel and time.
//
// Each file is identified on its own (header plus the leading channel/MAC
// fields, never the coefficient data) and the results are merged once.
// A file that cannot be identified is logged and skipped so one corrupt
// capture never costs the rest of the batch.

use crate::core::decoders::{decode_capture, identify};
use crate::core::error::{PnmError, Result};
use crate::core::file_type::PnmFileType;
use crate::core::format::DecodedCapture;
use crate::core::header::{capture_datetime, parse_header};
use crate::core::mac::MacAddress;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureIndexEntry {
    pub file_name: String,
    pub file_type: PnmFileType,
    pub capture_time: u32,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    #[serde(skip)]
    pub raw_bytes: Vec<u8>,
}

impl CaptureIndexEntry {
    /// Parses just enough of `bytes` to place the file in an index.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let identity = identify(&parse_header(&bytes)?)?;
        if identity.mac_address.is_unset() {
            return Err(PnmError::CorruptedData(format!(
                "{} carries no MAC address",
                file_name
            )));
        }

        Ok(Self {
            file_name,
            file_type: identity.file_type,
            capture_time: identity.capture_time,
            channel_id: identity.channel_id,
            mac_address: identity.mac_address,
            raw_bytes: bytes,
        })
    }

    /// Runs the full decoder for this entry's bytes.
    pub fn decode(&self) -> Result<DecodedCapture> {
        decode_capture(&parse_header(&self.raw_bytes)?)
    }
}

/// View reshaping stages, applied in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStage {
    /// Entries are always grouped by channel; kept to state intent.
    GroupByChannel,
    SortByCaptureTimeAscending,
    SortByFileType,
    SortMacKeysLexically,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelGroup {
    pub channel_id: u8,
    pub entries: Vec<CaptureIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacGroup {
    pub mac_address: MacAddress,
    pub channels: Vec<ChannelGroup>,
}

/// One row of [`CaptureIndex::summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub mac_address: MacAddress,
    pub channel_id: u8,
    pub capture_count: usize,
    pub file_types: Vec<PnmFileType>,
    pub first_capture: Option<String>,
    pub last_capture: Option<String>,
}

/// MAC → channel → entries. Groups keep first-seen order until a sort
/// stage reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureIndex {
    groups: Vec<MacGroup>,
}

impl CaptureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I: IntoIterator<Item = CaptureIndexEntry>>(entries: I) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    pub fn insert(&mut self, entry: CaptureIndexEntry) {
        let mac_group = match self
            .groups
            .iter()
            .position(|g| g.mac_address == entry.mac_address)
        {
            Some(i) => &mut self.groups[i],
            None => {
                self.groups.push(MacGroup {
                    mac_address: entry.mac_address,
                    channels: Vec::new(),
                });
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        };

        match mac_group
            .channels
            .iter_mut()
            .find(|c| c.channel_id == entry.channel_id)
        {
            Some(channel) => channel.entries.push(entry),
            None => mac_group.channels.push(ChannelGroup {
                channel_id: entry.channel_id,
                entries: vec![entry],
            }),
        }
    }

    pub fn apply_stages(&mut self, stages: &[SortStage]) {
        for stage in stages {
            debug!("applying sort stage {:?}", stage);
            match stage {
                SortStage::GroupByChannel => {}
                SortStage::SortByCaptureTimeAscending => self.for_each_channel(|c| {
                    c.entries.sort_by_key(|e| e.capture_time);
                }),
                SortStage::SortByFileType => self.for_each_channel(|c| {
                    c.entries.sort_by_key(|e| e.file_type);
                }),
                SortStage::SortMacKeysLexically => {
                    self.groups
                        .sort_by_key(|g| g.mac_address.to_string());
                }
            }
        }
    }

    fn for_each_channel<F: FnMut(&mut ChannelGroup)>(&mut self, mut f: F) {
        for group in &mut self.groups {
            for channel in &mut group.channels {
                f(channel);
            }
        }
    }

    pub fn groups(&self) -> &[MacGroup] {
        &self.groups
    }

    pub fn macs(&self) -> Vec<MacAddress> {
        self.groups.iter().map(|g| g.mac_address).collect()
    }

    pub fn channels(&self, mac: MacAddress) -> Vec<u8> {
        self.group(mac)
            .map(|g| g.channels.iter().map(|c| c.channel_id).collect())
            .unwrap_or_default()
    }

    pub fn entries(&self, mac: MacAddress, channel_id: u8) -> &[CaptureIndexEntry] {
        self.group(mac)
            .and_then(|g| g.channels.iter().find(|c| c.channel_id == channel_id))
            .map(|c| c.entries.as_slice())
            .unwrap_or(&[])
    }

    fn group(&self, mac: MacAddress) -> Option<&MacGroup> {
        self.groups.iter().find(|g| g.mac_address == mac)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaptureIndexEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.channels.iter())
            .flat_map(|c| c.entries.iter())
    }

    pub fn entries_of_type(&self, file_type: PnmFileType) -> Vec<&CaptureIndexEntry> {
        self.iter().filter(|e| e.file_type == file_type).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn summary(&self) -> Vec<ChannelSummary> {
        let mut rows = Vec::new();
        for group in &self.groups {
            for channel in &group.channels {
                let mut file_types: Vec<PnmFileType> =
                    channel.entries.iter().map(|e| e.file_type).collect();
                file_types.sort();
                file_types.dedup();

                let times = channel.entries.iter().map(|e| e.capture_time);
                let to_text = |t: u32| capture_datetime(t).map(|dt| dt.to_rfc3339());

                rows.push(ChannelSummary {
                    mac_address: group.mac_address,
                    channel_id: channel.channel_id,
                    capture_count: channel.entries.len(),
                    file_types,
                    first_capture: times.clone().min().and_then(to_text),
                    last_capture: times.max().and_then(to_text),
                });
            }
        }
        rows
    }
}

/// Indexes a batch of `(file name, bytes)` pairs, skipping files that
/// cannot be identified.
pub fn build_index<I, N>(files: I) -> CaptureIndex
where
    I: IntoIterator<Item = (N, Vec<u8>)>,
    N: Into<String>,
{
    let entries: Vec<CaptureIndexEntry> = files
        .into_iter()
        .filter_map(|(name, bytes)| {
            let name = name.into();
            match CaptureIndexEntry::from_bytes(name.clone(), bytes) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping capture {}: {}", name, e);
                    None
                }
            }
        })
        .collect();

    debug!("indexed {} captures", entries.len());
    CaptureIndex::from_entries(entries)
}
