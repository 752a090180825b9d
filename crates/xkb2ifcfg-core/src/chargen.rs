// xkb2ifcfg Chargen Document
// Assembles the character maps of all modifier combinations and serializes them

use crate::keyboard::{Keyboard, Keysym};
use crate::keycode::{NON_PRINTABLE, PRINTABLE};
use crate::modifier::{with_held, with_latched, ModifierCombination};
use crate::resolver::{resolve_non_printable, resolve_printable, EnterByte, Entry, Resolution};
use crate::settings::Settings;
use crate::xml::{ExpandingXmlBuffer, XmlGenerator, XmlResult, DEFAULT_BUFFER_INCREMENT};
use crate::Key;

const BYTE_ATTRIBUTES: [&str; 6] = ["b0", "b1", "b2", "b3", "b4", "b5"];

/// Options shaping assembly and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Follow each character entry with a `<!-- c -->` comment
    pub annotate: bool,
    pub enter: EnterByte,
    pub buffer_increment: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            annotate: true,
            enter: EnterByte::AsProduced,
            buffer_increment: DEFAULT_BUFFER_INCREMENT,
        }
    }
}

impl From<&Settings> for Options {
    fn from(settings: &Settings) -> Self {
        Self {
            annotate: settings.annotate(),
            enter: if settings.enter_linefeed() {
                EnterByte::LineFeed
            } else {
                EnterByte::AsProduced
            },
            buffer_increment: settings.buffer_increment(),
        }
    }
}

/// Character entries of one modifier combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharMap {
    combination: ModifierCombination,
    entries: Vec<Entry>,
}

impl CharMap {
    pub fn combination(&self) -> ModifierCombination {
        self.combination
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First entry for `key`
    pub fn find(&self, key: Key) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Character { .. }))
    }

    pub fn effects(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Effect { .. }))
    }
}

/// A key skipped because its symbol starts a composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposingKey {
    pub key: Key,
    pub keysym: Keysym,
    pub keysym_name: String,
    pub combination: ModifierCombination,
}

/// The chargen document: one map per modifier combination in fixed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chargen {
    maps: Vec<CharMap>,
    composing: Vec<ComposingKey>,
}

impl Chargen {
    /// Resolve every key under every modifier combination
    pub fn assemble<K: Keyboard + ?Sized>(kb: &mut K, options: &Options) -> Self {
        let mut maps = Vec::new();
        let mut composing = Vec::new();

        for combination in ModifierCombination::all() {
            let entries = with_latched(kb, combination, |kb| {
                let mut entries = Vec::new();

                for mapping in PRINTABLE.iter() {
                    let resolution =
                        with_held(kb, combination, |kb| resolve_printable(kb, mapping));
                    match resolution {
                        Resolution::Entry(entry) => entries.push(entry),
                        Resolution::Composing(keysym) => {
                            let keysym_name = kb.keysym_name(keysym);
                            log::warn!(
                                "unsupported composing keysym <{}> on {} ({})",
                                keysym_name,
                                mapping.key,
                                combination
                            );
                            composing.push(ComposingKey {
                                key: mapping.key,
                                keysym,
                                keysym_name,
                                combination,
                            });
                        }
                        Resolution::Nothing => {}
                    }
                }

                if combination.is_none() {
                    for mapping in NON_PRINTABLE.iter() {
                        entries.push(resolve_non_printable(kb, mapping, options.enter));
                    }
                }

                entries
            });

            log::debug!("{}: {} entries", combination, entries.len());
            maps.push(CharMap {
                combination,
                entries,
            });
        }

        Self { maps, composing }
    }

    pub fn maps(&self) -> &[CharMap] {
        &self.maps
    }

    pub fn map(&self, combination: ModifierCombination) -> Option<&CharMap> {
        self.maps.iter().find(|m| m.combination == combination)
    }

    /// Keys skipped as composing, in resolution order
    pub fn composing(&self) -> &[ComposingKey] {
        &self.composing
    }

    /// Write all maps as children of the current element
    pub fn write_xml(&self, xml: &mut XmlGenerator, options: &Options) -> XmlResult {
        for map in &self.maps {
            if map.combination.is_none() {
                xml.node("map", |xml| {
                    xml.comment("\n\t\t", "printable")?;
                    for entry in map.characters() {
                        write_entry(xml, entry, options.annotate)?;
                    }

                    xml.comment("\n\n\t\t", "non-printable")?;
                    for entry in map.effects() {
                        write_entry(xml, entry, options.annotate)?;
                    }
                    Ok(())
                })?;
            } else {
                xml.comment("\n\n\t", &map.combination.to_string())?;
                xml.node("map", |xml| {
                    for (name, value) in map.combination.attributes() {
                        xml.attribute(name, value)?;
                    }
                    for entry in map.entries() {
                        write_entry(xml, entry, options.annotate)?;
                    }
                    Ok(())
                })?;
            }
        }
        Ok(())
    }

    /// Serialize into a complete `<chargen>` document
    pub fn to_xml(&self, options: &Options) -> String {
        ExpandingXmlBuffer::new(options.buffer_increment)
            .generate("chargen", |xml| self.write_xml(xml, options))
    }
}

fn write_entry(xml: &mut XmlGenerator, entry: &Entry, annotate: bool) -> XmlResult {
    match entry {
        Entry::Character { key, bytes } => {
            xml.node("key", |xml| {
                xml.attribute("name", key.name())?;
                for (name, byte) in BYTE_ATTRIBUTES.iter().zip(bytes.iter()) {
                    xml.attribute(name, byte)?;
                }
                Ok(())
            })?;
            match entry.text() {
                Some(text) if annotate => xml.comment("\t", text),
                _ => Ok(()),
            }
        }
        Entry::Effect { key, byte } => xml.node("key", |xml| {
            xml.attribute("name", key.name())?;
            xml.attribute("ascii", byte)
        }),
    }
}
