use {
    super::*,
    crate::{meminfo::MemInfo, meter::Meter, severity::Severity, terminal::Session},
    crossterm::{
        cursor, queue,
        style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    },
    tracing::debug,
};

/// separates a meter from its label.
const SEPARATOR: char = '▏';

impl<C, S, M> App<C, S, M>
where
    C: Clock,
    S: StatsSource,
    M: StatsSource,
{
    /// draws one frame. this blocks for the sampling interval.
    pub(crate) fn frame(&self, output: &mut impl Write) -> Result<(), Error> {
        Session::home(output)?;
        self.memory(output)?;
        output.flush()?;

        Session::home(output)?;
        queue!(output, cursor::MoveDown(1))?;
        self.cpu(output)?;
        output.flush()?;

        Ok(())
    }

    /// the width of the aggregate meters, one core's worth of cells per cpu.
    fn wide(&self) -> Meter {
        let cells = self.sampler.nproc() * usize::from(self.config.core_width);
        Meter::new(u16::try_from(cells).unwrap_or(u16::MAX))
    }

    fn memory(&self, output: &mut impl Write) -> Result<(), Error> {
        let info = self.sampler.read_memory()?;
        let MemInfo {
            total,
            free,
            buffers,
            cached,
            ..
        } = info;
        let (used, usage) = (info.used(), info.usage());
        debug!(used, total, "read memory");

        queue!(output, Print("RAM "))?;
        self.wide().draw(usage, output)?;
        label(output, usage)?;
        queue!(
            output,
            Print(format!("  {:.1}", gib(used))),
            ResetColor,
            Print(format!("/{:.1}Gi", gib(total))),
            SetAttribute(Attribute::Dim),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(
                "  [{:.1} = {:.1} + {:.1}(f) + {:.1}(b) + {:.1}(c)]",
                gib(total),
                gib(used),
                gib(free),
                gib(buffers),
                gib(cached),
            )),
            ResetColor,
            Print("   "),
        )?;

        Ok(())
    }

    fn cpu(&self, output: &mut impl Write) -> Result<(), Error> {
        let recording = self.sampler.sample_cpu(self.config.interval)?;
        let usage = recording.system_ratio();
        debug!(usage, "sampled cpu");

        queue!(output, Print("CPU "))?;
        self.wide().draw(usage, output)?;
        label(output, usage)?;
        queue!(output, ResetColor, Print("  "), cursor::MoveToNextLine(1), Print("    "))?;

        let core = Meter::new(self.config.core_width);
        for usage in recording.cpu_ratios() {
            core.draw(usage, output)?;
        }
        queue!(output, ResetColor, Print(SEPARATOR))?;

        Ok(())
    }
}

/// prints the separator and the percentage label of a meter, tinted by its value.
///
/// the value's tint is left set.
fn label(output: &mut impl Write, ratio: f64) -> io::Result<()> {
    let tier = Severity::classify(ratio);
    queue!(
        output,
        ResetColor,
        Print(SEPARATOR),
        SetForegroundColor(tier.color()),
        Print(format!("{:4.1}%", ratio * 100.0)),
    )
}

/// converts kibibytes to gibibytes.
fn gib(kib: u64) -> f64 {
    kib as f64 / f64::from(1 << 20)
}
