use KiRates::Examples::kinetics_examples::kin_examples;
use KiRates::Examples::root_find_examples::root_find_examples;
use KiRates::Examples::thermo_examples::thermo_examples;
use KiRates::Utils::logger::init_logger;
use KiRates::settings::KineticsSettings;

pub fn main() {
    let settings = KineticsSettings::from_file_or_default("kinetics_config.json");
    if let Err(e) = init_logger(&settings.log) {
        eprintln!("logger is not started: {}", e);
    }
    //
    let task: usize = 0;
    kin_examples(task);
    thermo_examples(task);
    root_find_examples(1);
}
