//! Built-in tool catalog.

use crate::model::{Category, Invocation, ToolDescriptor};

const fn internal(
    title: &'static str,
    description: &'static str,
    category: Category,
    plugin_id: &'static str,
    argument_template: &'static str,
) -> ToolDescriptor {
    ToolDescriptor {
        title,
        description,
        category,
        invocation: Invocation::Internal { plugin_id },
        argument_template,
    }
}

const fn external(
    title: &'static str,
    description: &'static str,
    category: Category,
    binary: &'static str,
    argument_template: &'static str,
) -> ToolDescriptor {
    ToolDescriptor {
        title,
        description,
        category,
        invocation: Invocation::External { binary },
        argument_template,
    }
}

static TOOLS: [ToolDescriptor; 26] = [
    external("WinPmem", "Live capture (Admin)", Category::Acquisition, "winpmem_mini_x64.exe", "-d mem.img"),
    external("DumpIt", "Magnet DumpIt", Category::Acquisition, "DumpIt.exe", "/TYPE DMP /OUTPUT mem.img"),
    external("Moneta", "Malware Scanner", Category::LiveScan, "moneta64.exe", "-m ioc -p * --filter * -d"),
    external("HollowsHunter", "Scan implants", Category::LiveScan, "hollows_hunter64.exe", "/pid <PID> /dir .\\Output"),
    external("InjThreadEx", "Get-InjectedThreadEx", Category::LiveScan, "Get-InjectedThreadEx.exe", ""),
    external("MemProcFS", "Mount & Forensic Mode 1", Category::MemProcFS, "MemProcFS.exe", "-device <IMAGE> -forensic 1"),
    internal("PsList", "List Processes", Category::Process, "windows.pslist.PsList", ""),
    internal("PsScan", "Deep Process Scan", Category::Process, "windows.psscan.PsScan", ""),
    internal("PsTree", "Process Tree", Category::Process, "windows.pstree.PsTree", ""),
    internal("DllList", "List DLLs", Category::Objects, "windows.dlllist.DllList", "--pid <PID>"),
    internal("CmdLine", "Command Lines", Category::Objects, "windows.cmdline.CmdLine", ""),
    internal("GetSIDs", "Process SIDs", Category::Objects, "windows.getsids.GetSIDs", ""),
    internal("Handles", "Open Handles", Category::Objects, "windows.handles.Handles", "--pid <PID>"),
    internal("NetStat", "Network Structures", Category::Network, "windows.netstat.NetStat", ""),
    internal("NetScan", "Deep Net Scan", Category::Network, "windows.netscan.NetScan", "--include-corrupt"),
    internal("Malfind", "Suspicious RWX", Category::Injection, "windows.malfind.Malfind", "--dump"),
    internal("LdrModules", "Unlinked DLLs", Category::Injection, "windows.ldrmodules.LdrModules", ""),
    internal("VadYaraScan", "Scan with YARA File", Category::Injection, "windows.vadyarascan.VadYaraScan", "--yara-file <RULES>"),
    internal("Modules", "Kernel Drivers", Category::Rootkits, "windows.modules.Modules", ""),
    internal("ModScan", "Hidden Modules (Rootkits)", Category::Rootkits, "windows.modscan.ModScan", "--dump"),
    internal("SSDT", "Service Descriptor Table", Category::Rootkits, "windows.ssdt.SSDT", ""),
    internal("DriverIrp", "Driver IRP Hooks", Category::Rootkits, "windows.driverirp.DriverIrp", ""),
    internal("FileScan", "Find Files (MFT/Cache)", Category::Extraction, "windows.filescan.FileScan", ""),
    internal("SvcScan", "Windows Services", Category::Extraction, "windows.svcscan.SvcScan", ""),
    internal("MemMap", "Memory Map", Category::Extraction, "windows.memmap.Memmap", "--pid <PID>"),
    internal("DumpFiles", "Extract Files", Category::Extraction, "windows.dumpfiles.DumpFiles", "--pid <PID>"),
];

/// All tools in display order.
pub fn tools() -> &'static [ToolDescriptor] {
    &TOOLS
}

/// Contiguous runs of tools sharing a category, keeping each tool's index into `tools`.
pub fn groups(tools: &[ToolDescriptor]) -> Vec<(Category, Vec<(usize, &ToolDescriptor)>)> {
    let mut out: Vec<(Category, Vec<(usize, &ToolDescriptor)>)> = Vec::new();
    for (idx, tool) in tools.iter().enumerate() {
        match out.last_mut() {
            Some((category, members)) if *category == tool.category => members.push((idx, tool)),
            _ => out.push((tool.category, vec![(idx, tool)])),
        }
    }
    out
}
