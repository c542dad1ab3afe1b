//! Modulation and reception parameters shared by carriers and origins.

named_enum! {
    /// Spectral inversion of a cable carrier.
    ///
    /// Devices frequently cannot detect inversion on their own, so the true
    /// value of a cable carrier is only known after a successful lock.
    SpectrumInversion {
        Off => "Off",
        On => "On",
        #[default]
        Auto => "Auto",
    }
}
impl SpectrumInversion {
    /// The other hypothesis to try when a tune under this one failed.
    pub fn flipped(&self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off | Self::Auto => Self::On,
        }
    }
}

named_enum! {
    /// Channel bandwidth of cable and terrestrial carriers.
    Bandwidth {
        Six => "Six",
        Seven => "Seven",
        Eight => "Eight",
        Reserved => "Reserved",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    CableModulation {
        Qam16 => "QAM16",
        Qam32 => "QAM32",
        Qam64 => "QAM64",
        Qam128 => "QAM128",
        Qam256 => "QAM256",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    Polarization {
        Horizontal => "Horizontal",
        Vertical => "Vertical",
        Left => "Left",
        Right => "Right",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    /// Inner forward error correction code rate.
    InnerFec {
        Conv12 => "Conv1_2",
        Conv23 => "Conv2_3",
        Conv34 => "Conv3_4",
        Conv35 => "Conv3_5",
        Conv45 => "Conv4_5",
        Conv56 => "Conv5_6",
        Conv78 => "Conv7_8",
        Conv89 => "Conv8_9",
        Conv910 => "Conv9_10",
        NoConv => "NoConv",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    SatelliteModulation {
        Qpsk => "QPSK",
        Psk8 => "PSK8",
        Auto => "Auto",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    /// DVB-S2 roll-off factor; meaningless for plain DVB-S.
    RollOff {
        R35 => "Alpha35",
        R25 => "Alpha25",
        R20 => "Alpha20",
        #[default]
        NotDefined => "NotDefined",
    }
}

named_enum! {
    /// DiSEqC switch position selecting one dish or LNB.
    DiseqcPosition {
        #[default]
        None => "None",
        Lnb1 => "DiSEqC1",
        Lnb2 => "DiSEqC2",
        Lnb3 => "DiSEqC3",
        Lnb4 => "DiSEqC4",
        BurstOn => "BurstOn",
        BurstOff => "BurstOff",
    }
}
