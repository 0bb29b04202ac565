// Build-Script für die Globus-Firmware
//
// - WLAN-Zugangsdaten aus .env in den Build übernehmen (config.rs liest sie per env!)
// - Linker-Skripte für defmt und das ESP32-C6 Speicherlayout eintragen

fn main() {
    // .env im Crate-Verzeichnis ist optional, sonst zählen die Shell-Variablen
    if dotenvy::dotenv().is_err() {
        println!(
            "cargo:warning=Keine .env gefunden: WIFI_SSID und WIFI_PASSWORD müssen in der Umgebung stehen"
        );
    }

    for key in ["WIFI_SSID", "WIFI_PASSWORD"] {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_hints();

    // defmt-Symbole (Logging über esp-println)
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // Speicherlayout und Startup, muss als letztes Skript kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Der Linker ruft dieses Script bei Fehlern erneut auf (--error-handling-script)
// und bekommt für die typischen Setup-Fehler einen Hinweis
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, what, ..] = args.as_slice() {
        if kind == "undefined-symbol" {
            let hint = match what.as_str() {
                what if what.starts_with("_defmt_") => Some(
                    "defmt-Symbole fehlen: ist `defmt.x` eingetragen und `esp_println` eingebunden?",
                ),
                "_stack_start" => Some("Linker-Skript `linkall.x` fehlt"),
                what if what.starts_with("esp_rtos_") => Some(
                    "esp-radio findet keinen Scheduler: wird `esp_rtos::start` vor dem WLAN aufgerufen?",
                ),
                "free" | "malloc" | "calloc" | "malloc_internal" | "free_internal" => {
                    Some("Heap fehlt: `esp-alloc` Dependency und `heap_allocator!` in main.rs prüfen")
                }
                _ => None,
            };
            if let Some(hint) = hint {
                eprintln!();
                eprintln!("Hinweis: {}", hint);
                eprintln!();
            }
            std::process::exit(0);
        }
        std::process::exit(1);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
