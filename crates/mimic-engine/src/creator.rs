use mimic_core::class::{ClassDefinition, Member};
use mimic_core::error::ClassModelError;
use mimic_core::ClassHandle;
use tracing::{debug, info, warn};

use crate::{MimicError, MimicPhase, MimicReport, PhaseReport, Result};

/// Copies the shape of a source class onto a destination class.
///
/// Every operation snapshots the source before locking the destination, so
/// the two handles may point to the same definition. Members the destination
/// already declares (by key) are skipped; any other failure aborts the
/// operation. Work done before a failure is kept: there is no rollback, and
/// a destination left half populated should not be realized.
#[derive(Debug, Default, Clone, Copy)]
pub struct MimicCreator;

impl MimicCreator {
    pub fn new() -> Self {
        Self
    }

    /// Runs the interface, field, constructor and method copies in that order.
    ///
    /// Fields go before constructors and methods because their bodies are
    /// checked against the destination's fields when added.
    pub fn mimic_class(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<()> {
        self.mimic_class_report(src, dst).map(|_| ())
    }

    pub fn mimic_class_report(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<MimicReport> {
        let report = MimicReport {
            interfaces: self.copy_interfaces(src, dst)?,
            fields: self.copy_fields(src, dst)?,
            constructors: self.copy_constructors(src, dst)?,
            methods: self.copy_methods(src, dst)?,
        };
        info!(
            "mimicked {} into {}: {} added, {} skipped",
            src.name(),
            dst.name(),
            report.added(),
            report.skipped()
        );
        Ok(report)
    }

    pub fn mimic_interfaces(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<()> {
        self.copy_interfaces(src, dst).map(|_| ())
    }

    pub fn mimic_fields(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<()> {
        self.copy_fields(src, dst).map(|_| ())
    }

    /// Constructor bodies must only touch fields the destination declares,
    /// so call [`Self::mimic_fields`] first when they use mimicked fields.
    pub fn mimic_constructors(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<()> {
        self.copy_constructors(src, dst).map(|_| ())
    }

    pub fn mimic_methods(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<()> {
        self.copy_methods(src, dst).map(|_| ())
    }

    fn copy_interfaces(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<PhaseReport> {
        let interfaces = src.with_class(|class| class.interfaces().to_vec());
        // interfaces are not pre-filtered, a duplicate is reported by the class itself
        copy_members(
            MimicPhase::Interfaces,
            src,
            dst,
            interfaces,
            false,
            ClassDefinition::add_interface,
        )
    }

    fn copy_fields(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<PhaseReport> {
        let fields = src.with_class(|class| class.fields().to_vec());
        copy_members(
            MimicPhase::Fields,
            src,
            dst,
            fields,
            true,
            ClassDefinition::add_field,
        )
    }

    fn copy_constructors(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<PhaseReport> {
        let ctors = src.with_class(|class| class.constructors().to_vec());
        copy_members(
            MimicPhase::Constructors,
            src,
            dst,
            ctors,
            true,
            ClassDefinition::add_constructor,
        )
    }

    fn copy_methods(&self, src: &ClassHandle, dst: &ClassHandle) -> Result<PhaseReport> {
        let methods = src.with_class(|class| class.methods().to_vec());
        copy_members(
            MimicPhase::Methods,
            src,
            dst,
            methods,
            true,
            ClassDefinition::add_method,
        )
    }
}

fn copy_members<M: Member>(
    phase: MimicPhase,
    src: &ClassHandle,
    dst: &ClassHandle,
    members: Vec<M>,
    skip_present: bool,
    add: impl Fn(&mut ClassDefinition, M) -> std::result::Result<(), ClassModelError>,
) -> Result<PhaseReport> {
    let source_class = src.name();
    dst.with_class_mut(|class| {
        let mut report = PhaseReport::default();
        for member in members {
            let key = member.key();
            if skip_present && class.has_member(&key) {
                debug!("{}: {} already mimicked", class.name(), key);
                report.skipped += 1;
                continue;
            }
            match add(class, member) {
                Ok(()) => {
                    debug!("{}: mimicked {} from {}", class.name(), key, source_class);
                    report.added += 1;
                }
                Err(ClassModelError::DuplicateMember { .. }) => {
                    debug!("{}: {} already mimicked", class.name(), key);
                    report.skipped += 1;
                }
                Err(cause) => {
                    warn!("{}: cannot mimic {}: {}", class.name(), key, cause);
                    return Err(MimicError {
                        phase,
                        source_class,
                        destination: class.name().clone(),
                        member: key,
                        cause,
                    });
                }
            }
        }
        info!(
            "{} -> {}: {} {} added, {} skipped",
            source_class,
            class.name(),
            report.added,
            phase,
            report.skipped
        );
        Ok(report)
    })
}
